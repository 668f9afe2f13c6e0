use crate::{
    models::{CategoryLabel, Recommendation},
    services::{catalog::Catalog, selector::descending},
};

/// Maximum number of resources returned per request
pub const MAX_RECOMMENDATIONS: usize = 9;

/// Expands selected categories into catalog resources.
///
/// Every resource inherits its category's score as confidence. The
/// flattened list is re-ranked by confidence as a whole (stable, so catalog
/// order survives within a category and selection order between tied
/// categories) and cut to `cap`. Categories absent from the catalog
/// contribute nothing.
pub fn assemble(
    selected: &[(CategoryLabel, f64)],
    catalog: &Catalog,
    cap: usize,
) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = selected
        .iter()
        .flat_map(|&(category, confidence)| {
            catalog
                .resources_for(category)
                .iter()
                .map(move |resource| Recommendation {
                    resource: *resource,
                    category,
                    confidence,
                })
        })
        .collect();

    recommendations.sort_by(|a, b| descending(a.confidence, b.confidence));
    recommendations.truncate(cap);
    recommendations
}
