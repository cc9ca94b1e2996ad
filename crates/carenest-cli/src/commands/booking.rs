use super::AppContext;
use crate::{BookArgs, DraftArgs};
use anyhow::{Context, Result, bail};
use carenest_application::{ConfirmationScreen, SaveState};
use carenest_core::booking::{DraftPatch, SaveOutcome, SelectionFlow, TimeSlot};
use carenest_core::catalogue::CatalogueProvider;
use carenest_core::pricing::PriceBreakdown;

pub fn slots() -> Result<()> {
    for slot in TimeSlot::all() {
        println!("{}", slot);
    }
    Ok(())
}

pub fn quote(ctx: &AppContext, args: &DraftArgs) -> Result<()> {
    let flow = build_flow(ctx, args)?;
    let draft = flow.draft();
    if let Some(entity) = &draft.selected_entity {
        println!("{}", entity.name);
    }
    for item in &draft.line_items {
        println!("  {} x{}  ₹{}", item.name, item.quantity, item.effective_price());
    }
    print_price(&flow.price());
    Ok(())
}

pub async fn book(ctx: &AppContext, args: &BookArgs) -> Result<()> {
    let mut flow = build_flow(ctx, &args.draft)?;

    let slot = TimeSlot::parse(&args.slot)?;
    let mut patch = DraftPatch::new().date(args.date).time_slot(slot);
    if let Some(address) = &args.address {
        patch = patch.address(address);
    }
    if let Some(patient) = &args.patient {
        patch = patch.patient_info(patient);
    }
    if let Some(notes) = &args.notes {
        patch = patch.notes(notes);
    }
    flow.update(patch)?;

    let confirmed = flow.confirm()?;
    println!("{}", confirmed.title());
    println!("{} at {}", confirmed.date(), confirmed.time_slot());
    print_price(&confirmed.price());

    if !ctx.is_signed_in().await {
        println!("Not signed in: booking confirmed but not saved to history.");
    }

    let screen = ConfirmationScreen::new(confirmed, ctx.gateway());
    if let Some(handle) = screen.on_confirmed() {
        handle.await.context("Booking save task failed")?;
    }

    // A failed save has already been reported as a notice.
    if let SaveState::Saved(SaveOutcome::Saved(id)) = screen.save_state() {
        println!("Saved as {}", id);
    }
    Ok(())
}

pub async fn history(ctx: &AppContext, json: bool) -> Result<()> {
    let records = ctx
        .gateway()
        .history()
        .await
        .context("Sign in with --user to see booking history")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }
    if records.is_empty() {
        println!("No bookings yet.");
        return Ok(());
    }
    for record in &records {
        let booking = &record.booking;
        println!(
            "{}  {} {:<9} {:<10} ₹{:<6} {}",
            record.id,
            booking.booking_date,
            booking.booking_time,
            booking.status,
            booking.amount,
            booking.title
        );
    }
    Ok(())
}

fn build_flow(ctx: &AppContext, args: &DraftArgs) -> Result<SelectionFlow> {
    let vertical = args.vertical;
    let resolver = ctx.config.pricing.resolver_for(vertical);
    let mut flow = SelectionFlow::new(vertical, resolver);

    if let Some(entity_id) = &args.entity {
        let entity = ctx
            .catalogue
            .find(vertical, entity_id)
            .with_context(|| format!("No {} entry '{}'", vertical, entity_id))?;
        if !entity.available {
            bail!("{} is currently unavailable", entity.name);
        }
        flow.select_entity(entity)?;
    }

    for raw in &args.items {
        let (id, quantity) = parse_item(raw)?;
        let item = ctx
            .catalogue
            .find(vertical, id)
            .with_context(|| format!("No {} item '{}'", vertical, id))?;
        flow.add_item(item.to_line_item(quantity))?;
    }

    let mut patch = DraftPatch::new();
    if let Some(mode) = args.mode {
        patch = patch.mode(mode);
    }
    if let Some(duration) = args.duration {
        patch = patch.duration(duration);
    }
    if patch != DraftPatch::default() {
        flow.update(patch)?;
    }

    if let Some(code) = &args.coupon {
        if !flow.apply_coupon(code)? {
            eprintln!("Coupon '{}' is not valid, ignoring it.", code);
        }
    }
    Ok(flow)
}

/// Splits `id[:quantity]`.
fn parse_item(raw: &str) -> Result<(&str, u32)> {
    match raw.split_once(':') {
        Some((id, quantity)) => {
            let quantity: u32 = quantity
                .parse()
                .with_context(|| format!("Invalid quantity in '{}'", raw))?;
            Ok((id, quantity.max(1)))
        }
        None => Ok((raw, 1)),
    }
}

fn print_price(price: &PriceBreakdown) {
    println!("Subtotal ₹{}", price.subtotal);
    if price.fee > 0 {
        println!("Fee      ₹{}", price.fee);
    }
    if price.discount > 0 {
        println!("Discount -₹{}", price.discount);
    }
    println!("Total    ₹{}", price.total);
}

#[cfg(test)]
mod tests {
    use super::*;
    use carenest_core::booking::Vertical;
    use carenest_core::config::RootConfig;
    use carenest_core::notification::NoticeLevel;
    use carenest_infrastructure::CareNestPaths;
    use tempfile::TempDir;

    fn doctor_booking() -> BookArgs {
        BookArgs {
            draft: DraftArgs {
                vertical: Vertical::Doctor,
                entity: Some("doc-sharma".to_string()),
                items: Vec::new(),
                mode: None,
                duration: None,
                coupon: None,
            },
            date: chrono::NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
            slot: "10:00 AM".to_string(),
            address: None,
            patient: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_failed_save_is_a_notice_not_an_error() {
        let temp_dir = TempDir::new().unwrap();
        // A plain file where the bookings directory should be.
        std::fs::write(temp_dir.path().join("bookings"), "").unwrap();
        let mut ctx = AppContext::new(
            CareNestPaths::new(temp_dir.path()),
            RootConfig::default(),
            Some("patient-1".to_string()),
        )
        .await
        .unwrap();

        book(&ctx, &doctor_booking()).await.unwrap();

        let notices = ctx.drain_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn test_successful_save_lands_in_history() {
        let temp_dir = TempDir::new().unwrap();
        let mut ctx = AppContext::new(
            CareNestPaths::new(temp_dir.path()),
            RootConfig::default(),
            Some("patient-1".to_string()),
        )
        .await
        .unwrap();

        book(&ctx, &doctor_booking()).await.unwrap();

        let records = ctx.gateway().history().await.unwrap();
        assert_eq!(records.len(), 1);
        assert!(ctx.drain_notices().is_empty());
    }

    #[test]
    fn test_parse_item_with_quantity() {
        assert_eq!(parse_item("med-paracetamol:3").unwrap(), ("med-paracetamol", 3));
        assert_eq!(parse_item("lab-cbc").unwrap(), ("lab-cbc", 1));
        assert_eq!(parse_item("lab-cbc:0").unwrap(), ("lab-cbc", 1));
        assert!(parse_item("lab-cbc:many").is_err());
    }
}
