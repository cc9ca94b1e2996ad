use super::AppContext;
use anyhow::Result;
use carenest_application::EmergencyDispatcher;

pub async fn run(ctx: &AppContext, location: &str) -> Result<()> {
    let dispatch = EmergencyDispatcher::new(ctx.gateway()).trigger(location).await;
    println!("{}", dispatch.reference);
    Ok(())
}
