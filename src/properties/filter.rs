use super::store::Listing;

/// The client's search constraints for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct Preferences {
    pub max_price: f64,
    pub min_bedrooms: u32,
    pub min_parking: u32,
    /// Matched case-insensitively as a substring of the listing's
    /// neighborhood. Empty matches every row.
    pub neighborhood: String,
}

/// Returns the listings satisfying all four predicates, in storage order.
///
/// Rows missing price, bedroom or parking data never match. No sorting
/// happens here; price ordering is the assistant's presentation duty.
pub fn search(listings: &[Listing], prefs: &Preferences) -> Vec<Listing> {
    listings
        .iter()
        .filter(|listing| matches(listing, prefs))
        .cloned()
        .collect()
}

fn matches(listing: &Listing, prefs: &Preferences) -> bool {
    let (Some(price), Some(bedrooms), Some(parking)) =
        (listing.total_price, listing.bedrooms, listing.parking)
    else {
        return false;
    };

    price <= prefs.max_price
        && bedrooms >= prefs.min_bedrooms
        && parking >= prefs.min_parking
        && listing
            .neighborhood
            .to_lowercase()
            .contains(&prefs.neighborhood.to_lowercase())
}
