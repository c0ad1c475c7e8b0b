use crate::part::Part;

#[derive(Debug, PartialEq, Clone)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Feeder {
    /// Machine-specific slot reference, e.g. "FDR_L_01".
    pub reference: String,

    /// The part this feeder currently serves, if loaded.
    pub part: Option<Part>,

    pub enabled: bool,
}

impl Feeder {
    pub fn new(reference: String) -> Self {
        Self {
            reference,
            part: None,
            enabled: true,
        }
    }

    pub fn with_part(mut self, part: Part) -> Self {
        self.part = Some(part);
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

pub fn find_enabled_feeder_for_part<'feeders>(feeders: &'feeders [Feeder], part: &Part) -> Option<&'feeders Feeder> {
    let matched_feeder = feeders
        .iter()
        .find(|&feeder| {
            feeder.enabled
                && feeder
                    .part
                    .as_ref()
                    .is_some_and(|feeder_part| feeder_part.id.eq(&part.id))
        });
    matched_feeder
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::feeder::{find_enabled_feeder_for_part, Feeder};
    use crate::part::Part;

    #[test]
    fn disabled_feeders_are_not_matched() {
        // given
        let part = Part::new("RES_0402_10K".to_string(), Decimal::ONE);
        let feeders = vec![
            Feeder::new("FDR_L_01".to_string())
                .with_part(part.clone())
                .with_enabled(false),
        ];

        // when
        let matched = find_enabled_feeder_for_part(&feeders, &part);

        // then
        assert!(matched.is_none());
    }

    #[test]
    fn first_enabled_feeder_serving_the_part_is_matched() {
        // given
        let part = Part::new("RES_0402_10K".to_string(), Decimal::ONE);
        let other_part = Part::new("CAP_0402_100N".to_string(), Decimal::ONE);
        let feeders = vec![
            Feeder::new("FDR_L_01".to_string()).with_part(other_part),
            Feeder::new("FDR_L_02".to_string())
                .with_part(part.clone())
                .with_enabled(false),
            Feeder::new("FDR_L_03".to_string()).with_part(part.clone()),
        ];

        // when
        let matched = find_enabled_feeder_for_part(&feeders, &part);

        // then
        assert_eq!(matched.map(|feeder| feeder.reference.as_str()), Some("FDR_L_03"));
    }
}
