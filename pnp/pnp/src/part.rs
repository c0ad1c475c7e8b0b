use rust_decimal::Decimal;

#[derive(Debug, Clone)]
#[derive(Hash, PartialEq, Eq, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Part {
    /// Unique within the part catalog.
    pub id: String,

    pub description: Option<String>,

    /// Physical component height, in millimeters.
    ///
    /// A height of zero means the part has not been measured yet; placements
    /// using such a part are reported as not-ready rather than rejected.
    pub height_mm: Decimal,
}

impl Part {
    pub fn new(id: String, height_mm: Decimal) -> Self {
        Self {
            id,
            description: None,
            height_mm,
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }
}

#[cfg(feature = "testing")]
impl Default for Part {
    fn default() -> Self {
        Self {
            id: "Default part".to_string(),
            description: None,
            height_mm: Decimal::ONE,
        }
    }
}
