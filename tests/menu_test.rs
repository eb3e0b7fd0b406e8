use feedreader::menu::{MenuToggle, MENU_HIDDEN_MARKER};

#[test]
fn test_menu_hidden_by_default() {
    let menu = MenuToggle::new();
    assert!(menu.is_hidden());
    assert_eq!(menu.marker(), Some(MENU_HIDDEN_MARKER));
}

#[test]
fn test_menu_click_shows_then_hides() {
    let mut menu = MenuToggle::new();

    menu.toggle();
    assert!(!menu.is_hidden());
    assert_eq!(menu.marker(), None);

    menu.toggle();
    assert!(menu.is_hidden());
    assert_eq!(menu.marker(), Some(MENU_HIDDEN_MARKER));
}

#[test]
fn test_menu_parity() {
    for n in 0..10 {
        let mut menu = MenuToggle::new();
        assert!(menu.toggle_n(2 * n), "{} toggles should leave it hidden", 2 * n);

        let mut menu = MenuToggle::new();
        assert!(
            !menu.toggle_n(2 * n + 1),
            "{} toggles should leave it shown",
            2 * n + 1
        );
    }
}
