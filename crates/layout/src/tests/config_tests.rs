use super::*;

const CUSTOM: &str = r#"
label_threshold = 600

[cards.showreel]
card_width = [[320, 300], [1280, 400]]
image_height = [[320, 160], [1280, 240]]
header_height = 40
bottom_area_height = 60
labels = { full = "Watch the reel", abridged = "Reel" }

[cards.experiments]
card_width = [[320, 300]]
image_height = [[320, 150]]
header_height = 40
bottom_area_height = 50
labels = { full = "Experiments", abridged = "Exp." }

[cards.playground]
card_width = [[320, 300]]
image_height = [[320, 150]]
header_height = 40
bottom_area_height = 50
labels = { full = "Playground", abridged = "Play" }

[cards.contact]
card_width = [[320, 300]]
image_height = [[320, 90]]
header_height = 32
bottom_area_height = 70
labels = { full = "Say hello", abridged = "Hello" }
"#;

#[test]
fn default_tables_pass_validation() {
    let config = LayoutConfig::default();
    config.validate().expect("scalars");
    for card in CardId::ALL {
        let layout = config.cards.get(card);
        BreakpointTable::new(layout.card_width.points().to_vec()).expect("card_width");
        BreakpointTable::new(layout.image_height.points().to_vec()).expect("image_height");
    }
}

#[test]
fn loads_custom_config_from_toml() {
    let config = LayoutConfig::from_toml_str(CUSTOM).expect("config");
    assert_eq!(config.label_threshold, 600.0);
    assert_eq!(config.cards.showreel.card_width.value_at(800.0), 350.0);
    assert_eq!(config.cards.contact.labels.abridged, "Hello");
}

#[test]
fn unsorted_table_in_toml_is_rejected() {
    let raw = CUSTOM.replace("[[320, 300], [1280, 400]]", "[[1280, 400], [320, 300]]");
    let err = LayoutConfig::from_toml_str(&raw).expect_err("unsorted");
    assert!(matches!(err, LayoutError::Parse(msg) if msg.contains("strictly increasing")));
}

#[test]
fn empty_table_in_toml_is_rejected() {
    let raw = CUSTOM.replace("card_width = [[320, 300]]\nimage_height = [[320, 90]]", "card_width = []\nimage_height = [[320, 90]]");
    assert!(LayoutConfig::from_toml_str(&raw).is_err());
}

#[test]
fn negative_constants_are_rejected() {
    let raw = CUSTOM.replace("header_height = 32", "header_height = -4");
    let err = LayoutConfig::from_toml_str(&raw).expect_err("negative header");
    assert!(matches!(err, LayoutError::InvalidConfiguration(msg) if msg.contains("contact.header_height")));
}

#[test]
fn load_reads_file_from_disk() {
    let dir = tempfile_dir();
    let path = dir.join("layout.toml");
    fs::write(&path, CUSTOM).expect("write");
    let config = LayoutConfig::load(&path).expect("load");
    assert_eq!(config.cards.playground.labels.full, "Playground");
    fs::remove_dir_all(dir).expect("cleanup");
}

fn tempfile_dir() -> std::path::PathBuf {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("layout_config_test_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    dir
}
