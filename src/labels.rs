//! The fixed PlantVillage class list the classifier was trained on.

/// Index-to-label mapping for the model's output layer. The order is the
/// training-time class order and must not change.
pub const CLASS_NAMES: [&str; 38] = [
    "Apple___Apple_scab",
    "Apple___Black_rot",
    "Apple___Cedar_apple_rust",
    "Apple___healthy",
    "Blueberry___healthy",
    "Cherry_(including_sour)___Powdery_mildew",
    "Cherry_(including_sour)___healthy",
    "Corn_(maize)___Cercospora_leaf_spot Gray_leaf_spot",
    "Corn_(maize)___Common_rust_",
    "Corn_(maize)___Northern_Leaf_Blight",
    "Corn_(maize)___healthy",
    "Grape___Black_rot",
    "Grape___Esca_(Black_Measles)",
    "Grape___Leaf_blight_(Isariopsis_Leaf_Spot)",
    "Grape___healthy",
    "Orange___Haunglongbing_(Citrus_greening)",
    "Peach___Bacterial_spot",
    "Peach___healthy",
    "Pepper,_bell___Bacterial_spot",
    "Pepper,_bell___healthy",
    "Potato___Early_blight",
    "Potato___Late_blight",
    "Potato___healthy",
    "Raspberry___healthy",
    "Soybean___healthy",
    "Squash___Powdery_mildew",
    "Strawberry___Leaf_scorch",
    "Strawberry___healthy",
    "Tomato___Bacterial_spot",
    "Tomato___Early_blight",
    "Tomato___Late_blight",
    "Tomato___Leaf_Mold",
    "Tomato___Septoria_leaf_spot",
    "Tomato___Spider_mites Two-spotted_spider_mite",
    "Tomato___Target_Spot",
    "Tomato___Tomato_Yellow_Leaf_Curl_Virus",
    "Tomato___Tomato_mosaic_virus",
    "Tomato___healthy",
];

pub const NUM_CLASSES: usize = CLASS_NAMES.len();

pub fn class_name(index: usize) -> Option<&'static str> {
    CLASS_NAMES.get(index).copied()
}

/// A label names a healthy plant when it contains "healthy" in any case.
pub fn is_healthy(label: &str) -> bool {
    label.to_lowercase().contains("healthy")
}

/// Human-readable form of a label: `Tomato___Late_blight` -> `Tomato - Late blight`.
pub fn display_name(label: &str) -> String {
    label.replace("___", " - ").replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_healthy_check_matches_every_healthy_label() {
        let healthy: Vec<&str> = CLASS_NAMES
            .iter()
            .copied()
            .filter(|label| is_healthy(label))
            .collect();

        assert_eq!(healthy.len(), 12);
        for label in CLASS_NAMES {
            assert_eq!(
                is_healthy(label),
                label.to_ascii_lowercase().contains("healthy"),
                "{label}"
            );
        }
        assert!(healthy.iter().all(|label| label.ends_with("___healthy")));
    }

    #[test]
    fn test_healthy_check_is_case_insensitive() {
        assert!(is_healthy("Tomato___HEALTHY"));
        assert!(is_healthy("Healthy"));
        assert!(!is_healthy("Tomato___Late_blight"));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("Tomato___Late_blight"), "Tomato - Late blight");
        assert_eq!(
            display_name("Corn_(maize)___Common_rust_"),
            "Corn (maize) - Common rust "
        );
        assert_eq!(
            display_name("Pepper,_bell___Bacterial_spot"),
            "Pepper, bell - Bacterial spot"
        );
    }

    #[test]
    fn test_class_name_lookup() {
        assert_eq!(NUM_CLASSES, 38);
        assert_eq!(class_name(0), Some("Apple___Apple_scab"));
        assert_eq!(class_name(37), Some("Tomato___healthy"));
        assert_eq!(class_name(38), None);
    }
}
