use super::AppContext;
use crate::ProviderAction;
use anyhow::{Context, Result};
use carenest_core::provider_link::LinkedProvider;

pub async fn run(ctx: &AppContext, action: ProviderAction) -> Result<()> {
    let service = ctx.providers();
    service
        .sync_with_session()
        .await
        .context("Failed to load linked providers")?;

    match action {
        ProviderAction::Link {
            id,
            name,
            service_type,
            email,
            phone,
            specialization,
            rating,
        } => {
            let mut provider = LinkedProvider::new(&id, name, service_type, email);
            if let Some(phone) = phone {
                provider = provider.with_phone(phone);
            }
            if let Some(specialization) = specialization {
                provider = provider.with_specialization(specialization);
            }
            if let Some(rating) = rating {
                provider = provider.with_rating(rating);
            }
            if service.link(provider).await? {
                println!("Linked {}", id);
            } else {
                println!("{} is already linked", id);
            }
        }
        ProviderAction::Unlink { id } => {
            if service.unlink(&id).await? {
                println!("Unlinked {}", id);
            } else {
                println!("{} was not linked", id);
            }
        }
        ProviderAction::List { service_type } => {
            let providers = match service_type {
                Some(service_type) => service.by_type(service_type).await?,
                None => service.providers().await?,
            };
            if providers.is_empty() {
                println!("No linked providers.");
            }
            for provider in &providers {
                println!(
                    "{:<16} {:<28} {:<16} {}",
                    provider.id,
                    provider.name,
                    provider.service_type,
                    provider.linked_date.format("%Y-%m-%d")
                );
            }
        }
    }
    Ok(())
}
