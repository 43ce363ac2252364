use serde::Serialize;

/// Growing tip and fertilizer advice for one crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropInfo {
    pub tip: &'static str,
    pub fertilizer: &'static str,
}

/// Advice returned for labels missing from the table.
pub const FALLBACK_INFO: CropInfo = CropInfo {
    tip: "No information available.",
    fertilizer: "Use balanced NPK fertilizers.",
};

const fn info(tip: &'static str, fertilizer: &'static str) -> CropInfo {
    CropInfo { tip, fertilizer }
}

static CROPS: &[(&str, CropInfo)] = &[
    ("rice", info(
        "Rice grows best in clayey soil with plenty of water and high humidity.",
        "Use urea and potash-rich fertilizers regularly for higher yield.",
    )),
    ("maize", info(
        "Maize requires warm weather, moderate rainfall, and loamy soil.",
        "Apply DAP and potash; avoid overwatering the plants.",
    )),
    ("chickpea", info(
        "Chickpea thrives in dry, cool climates and sandy soil.",
        "Use phosphate fertilizer before sowing for strong roots.",
    )),
    ("kidneybeans", info(
        "Kidney beans prefer cool weather and well-drained loamy soil.",
        "Use compost and potash fertilizers for better yield.",
    )),
    ("pigeonpeas", info(
        "Pigeon peas need warm, semi-arid climates and loamy soil.",
        "Use phosphate and organic manure during early stages.",
    )),
    ("mothbeans", info(
        "Moth beans grow well in dry, sandy soil with little rainfall.",
        "Add nitrogen and phosphate fertilizers moderately.",
    )),
    ("mungbean", info(
        "Mung beans prefer warm weather and sandy loam soil.",
        "Use DAP and compost before sowing.",
    )),
    ("blackgram", info(
        "Black gram requires warm, humid weather and loamy soil.",
        "Apply nitrogen and phosphate fertilizers early.",
    )),
    ("lentil", info(
        "Lentil grows best in cool, dry climate and sandy soil.",
        "Add phosphate fertilizer before sowing for better pods.",
    )),
    ("pomegranate", info(
        "Pomegranate grows in hot, dry climate and loamy soil.",
        "Use nitrogen and potash during flowering stage.",
    )),
    ("banana", info(
        "Banana requires humid climate and rich, organic soil.",
        "Add potassium and compost regularly.",
    )),
    ("mango", info(
        "Mango grows in hot, dry climates and loamy soil.",
        "Apply nitrogen and potash before flowering season.",
    )),
    ("grapes", info(
        "Grapes grow in hot, dry climate and well-drained soil.",
        "Use potash and compost for stronger vines.",
    )),
    ("watermelon", info(
        "Watermelon needs sandy soil and warm temperatures.",
        "Use potash and compost for sweeter fruits.",
    )),
    ("muskmelon", info(
        "Muskmelon grows well in sandy loam soil with good drainage.",
        "Use nitrogen and compost during early growth.",
    )),
    ("apple", info(
        "Apple needs cool climate and loamy soil with good drainage.",
        "Apply organic manure and potash before flowering.",
    )),
    ("orange", info(
        "Orange prefers subtropical climate and sandy loam soil.",
        "Use nitrogen and potash fertilizers twice yearly.",
    )),
    ("papaya", info(
        "Papaya grows in warm climate and fertile, well-drained soil.",
        "Use nitrogen and phosphate for better fruiting.",
    )),
    ("coconut", info(
        "Coconut thrives in sandy coastal soil with high humidity.",
        "Use organic compost and potash twice a year.",
    )),
    ("cotton", info(
        "Cotton grows well in black soil under warm conditions.",
        "Use NPK mix fertilizers during flowering.",
    )),
    ("jute", info(
        "Jute needs humid, warm climate and loamy soil.",
        "Use organic manure and potash before sowing.",
    )),
    ("coffee", info(
        "Coffee requires shade, humid weather, and rich soil.",
        "Use nitrogen and compost regularly to maintain yield.",
    )),
];

/// Look up advice for a crop label (case-insensitive). Unknown labels get
/// [`FALLBACK_INFO`].
pub fn crop_info(label: &str) -> CropInfo {
    let label = label.trim();
    CROPS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(label))
        .map(|(_, info)| *info)
        .unwrap_or(FALLBACK_INFO)
}

/// Every crop label the table knows about.
pub fn known_crops() -> impl Iterator<Item = &'static str> {
    CROPS.iter().map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_all_crops() {
        assert_eq!(known_crops().count(), 22);
        for name in known_crops() {
            let info = crop_info(name);
            assert_ne!(info, FALLBACK_INFO, "{name} should have its own advice");
            assert!(!info.tip.is_empty());
            assert!(!info.fertilizer.is_empty());
        }
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(crop_info("Rice"), crop_info("rice"));
        assert!(crop_info("COFFEE").tip.starts_with("Coffee"));
    }

    #[test]
    fn unknown_label_falls_back() {
        let info = crop_info("quinoa");
        assert_eq!(info.tip, "No information available.");
        assert_eq!(info.fertilizer, "Use balanced NPK fertilizers.");
    }
}
