use super::store::Listing;

/// Serializes listings into the text block embedded in the assistant prompt.
///
/// This is the single boundary between typed listings and prompt text.
/// Optional fields that are absent in the source row are left out entirely,
/// matching the prompt's no-placeholder rule.
pub fn render_listings(listings: &[Listing]) -> String {
    if listings.is_empty() {
        return "(no listings matched the current filters)".to_string();
    }

    listings
        .iter()
        .map(render_one)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_one(listing: &Listing) -> String {
    let mut lines = vec![format!("- {} ({})", listing.address, listing.neighborhood)];

    let mut facts = Vec::new();
    if let Some(bedrooms) = listing.bedrooms {
        facts.push(format!("quartos: {bedrooms}"));
    }
    if let Some(parking) = listing.parking {
        facts.push(format!("vagas: {parking}"));
    }
    if let Some(area) = listing.area {
        facts.push(format!("area: {} m2", format_amount(area)));
    }
    if !facts.is_empty() {
        lines.push(format!("  {}", facts.join(" | ")));
    }

    let mut money = Vec::new();
    if let Some(price) = listing.total_price {
        money.push(format!("valor_total: R$ {}", format_amount(price)));
    }
    if let Some(fee) = listing.condo_fee {
        money.push(format!("condominio: R$ {}", format_amount(fee)));
    }
    if !money.is_empty() {
        lines.push(format!("  {}", money.join(" | ")));
    }

    if let Some(station) = &listing.station {
        let mut metro = format!("  metro: {station}");
        if let Some(line) = &listing.station_line {
            metro.push_str(&format!(" - {line}"));
        }
        if let Some(distance) = listing.station_distance_m {
            metro.push_str(&format!(" ({} m)", format_amount(distance)));
        }
        lines.push(metro);
    }

    lines.join("\n")
}

fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}
