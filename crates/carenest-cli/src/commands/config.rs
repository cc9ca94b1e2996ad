use anyhow::Result;
use carenest_infrastructure::ConfigService;

pub fn init(service: &ConfigService) -> Result<()> {
    if service.write_default()? {
        println!("Created {}", service.path().display());
    } else {
        println!("Config already exists at {}", service.path().display());
    }
    Ok(())
}
