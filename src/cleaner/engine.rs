use crate::model::EngineClass;

/// Outcome of classifying an engine descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Class(EngineClass),
    /// Turbo / L / RS descriptors, deliberately not modeled.
    Unclassifiable,
    /// No rule matched. Kept as a sentinel and filtered before training.
    Unknown,
}

/// Ordered first-match substring rules. The order is load-bearing: a
/// descriptor containing both "1.6" and "Turbo" classifies as I4 because
/// the displacement rule is consulted first. Keep this a literal list,
/// never a map.
const ENGINE_RULES: &[(&str, EngineClass)] = &[
    ("1.0", EngineClass::I3),
    ("1.2", EngineClass::I3),
    ("1.5", EngineClass::I4),
    ("1.6", EngineClass::I4),
    ("1.7", EngineClass::I4),
    ("1.9", EngineClass::I4),
    ("2.0", EngineClass::I4),
    ("D5", EngineClass::I5),
    ("3.0", EngineClass::I6),
    ("xDrive30d", EngineClass::I6),
    ("300 d", EngineClass::I6),
    ("E 350 CGI", EngineClass::V6),
    ("S 350 d 4MATIC", EngineClass::V6),
    ("50 TDI", EngineClass::V6),
    ("55 TFSI", EngineClass::V6),
    ("Flying Spur", EngineClass::V8),
];

pub fn classify(descriptor: &str) -> Classification {
    let descriptor = descriptor.trim();
    for (pattern, class) in ENGINE_RULES {
        if descriptor.contains(pattern) {
            return Classification::Class(*class);
        }
    }
    if descriptor.contains("Turbo") || descriptor.contains('L') || descriptor.contains("RS") {
        return Classification::Unclassifiable;
    }
    Classification::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displacement_rules_map_to_cylinder_classes() {
        assert_eq!(classify("1.0 TSI"), Classification::Class(EngineClass::I3));
        assert_eq!(classify("1.6"), Classification::Class(EngineClass::I4));
        assert_eq!(classify("D5"), Classification::Class(EngineClass::I5));
        assert_eq!(classify("3.0 TDI"), Classification::Class(EngineClass::I6));
        assert_eq!(classify("xDrive30d"), Classification::Class(EngineClass::I6));
        assert_eq!(classify("55 TFSI"), Classification::Class(EngineClass::V6));
        assert_eq!(
            classify("Flying Spur"),
            Classification::Class(EngineClass::V8)
        );
    }

    #[test]
    fn rule_order_beats_turbo_exclusion() {
        // "1.6" is checked before the Turbo branch, strict left-to-right.
        assert_eq!(
            classify("1.6 Turbo"),
            Classification::Class(EngineClass::I4)
        );
        assert_eq!(
            classify("2.0 Turbo"),
            Classification::Class(EngineClass::I4)
        );
    }

    #[test]
    fn turbo_l_rs_are_unclassifiable() {
        assert_eq!(classify("Turbo S"), Classification::Unclassifiable);
        assert_eq!(classify("RS"), Classification::Unclassifiable);
        // Any capital L trips the exclusion, e.g. "2.2 L".
        assert_eq!(classify("2.2 L"), Classification::Unclassifiable);
    }

    #[test]
    fn unmatched_descriptor_is_the_unknown_sentinel() {
        assert_eq!(classify("1.4"), Classification::Unknown);
        assert_eq!(classify(""), Classification::Unknown);
    }
}
