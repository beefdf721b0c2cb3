use super::*;

#[test]
fn every_table_entry_parses() {
    for (name, _) in COLOR_PRESETS {
        let p = ColorPalette::try_preset(name).unwrap();
        assert_eq!(p.len(), 3, "{name}");
    }
}

#[test]
fn unknown_preset_falls_back_to_default() {
    assert_eq!(
        ColorPalette::preset("nonexistent"),
        ColorPalette::default_palette()
    );
    assert!(ColorPalette::try_preset("nonexistent").is_none());
    assert_eq!(
        ColorPalette::default_palette().colors()[0].to_hex(),
        "#1DB954"
    );
}

#[test]
fn lookup_is_case_insensitive() {
    assert_eq!(ColorPalette::preset("BLUE"), ColorPalette::preset("blue"));
}

#[test]
fn empty_palette_is_rejected() {
    assert!(ColorPalette::new(vec![]).unwrap_err().is_config());
    let empty: [&str; 0] = [];
    assert!(ColorPalette::from_hex(&empty).unwrap_err().is_config());
}

#[test]
fn rotation_wraps() {
    let p = ColorPalette::from_hex(&["#FF0000", "#00FF00", "#0000FF"]).unwrap();
    let r = p.rotated(4);
    assert_eq!(r.colors()[0].to_hex(), "#00FF00");
    assert_eq!(r.colors()[2].to_hex(), "#FF0000");
}
