use serde::{Deserialize, Serialize};

/// One assembled row of the draft list.
///
/// Field names on the wire are fixed by the published JSON shape, so each
/// field is renamed explicitly rather than through a case convention.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tap {
    #[serde(rename = "TapNumber")]
    pub tap_number: u32,
    #[serde(rename = "Brewery")]
    pub brewery: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Style")]
    pub style: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "ABV")]
    pub abv: String,
    #[serde(rename = "CrowlerPrice")]
    pub crowler_price: String,
    #[serde(rename = "GrowlerPrice")]
    pub growler_price: String,
    /// Set when the brewery cell carried the `**` promotional marker.
    #[serde(rename = "OnSale")]
    pub on_sale: bool,
}

impl Tap {
    pub fn new(tap_number: u32) -> Self {
        Tap { tap_number, ..Tap::default() }
    }
}
