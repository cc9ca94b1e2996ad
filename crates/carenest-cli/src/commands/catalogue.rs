use super::AppContext;
use crate::CatalogueArgs;
use anyhow::Result;
use carenest_core::catalogue::{CatalogueItem, CatalogueProvider, CatalogueQuery};

pub fn list(ctx: &AppContext, args: &CatalogueArgs) -> Result<()> {
    let mut query = CatalogueQuery::new().sort(args.sort);
    if let Some(search) = &args.search {
        query = query.search(search);
    }
    if let Some(specialization) = &args.specialization {
        query = query.specialization(specialization);
    }
    if let Some(kind) = args.kind {
        query = query.kind(kind);
    }
    if args.available {
        query = query.available_only();
    }

    let items = query.apply(ctx.catalogue.list(args.vertical));
    if items.is_empty() {
        println!("No matching {} entries.", args.vertical.label());
        return Ok(());
    }
    for item in &items {
        println!("{}", describe(item));
    }
    Ok(())
}

fn describe(item: &CatalogueItem) -> String {
    let mut line = format!("{:<18} {:<32} {}", item.id, item.name, price_label(item));
    if let Some(spec) = &item.specialization {
        line.push_str(&format!("  {}", spec));
    }
    if let Some(rating) = item.rating {
        line.push_str(&format!("  ★{:.1}", rating));
    }
    if item.fasting_required {
        line.push_str("  (fasting)");
    }
    if !item.available {
        line.push_str("  [unavailable]");
    }
    line
}

fn price_label(item: &CatalogueItem) -> String {
    match (item.price_per_hour, item.price_per_day) {
        (Some(hour), Some(day)) => format!("₹{}/hr ₹{}/day", hour, day),
        _ => match item.discount_price {
            Some(discount) => format!("₹{} (was ₹{})", discount, item.price),
            None => format!("₹{}", item.price),
        },
    }
}
