use super::*;
use proptest::prelude::*;

/// スキーム付き・なしのロケーション
fn locator_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z0-9_/-]{0,15}\\.xml",
        "classpath:[a-z][a-z0-9_/-]{0,15}\\.xml",
        "file:/[a-z][a-z0-9_/-]{0,15}\\.properties",
    ]
}

fn reader_strategy() -> impl Strategy<Value = Option<ReaderKind>> {
    prop_oneof![
        Just(None),
        Just(Some(ReaderKind::XML)),
        Just(Some(ReaderKind::PROPERTIES)),
        "[a-zA-Z]{1,10}".prop_map(|s| Some(ReaderKind::custom(s))),
    ]
}

proptest! {
    /// 読み出したロケーションは入力と同じ順序・内容
    #[test]
    fn prop_locators_preserve_order(locators in prop::collection::vec(locator_strategy(), 1..8)) {
        let decl = ImportDeclaration::new(locators.clone());
        prop_assert_eq!(decl.locators(), locators.as_slice());
    }

    /// 明示したリーダー種別は置き換えられない
    #[test]
    fn prop_reader_is_preserved_or_defaulted(
        locators in prop::collection::vec(locator_strategy(), 1..4),
        reader in reader_strategy()
    ) {
        let decl = ImportDeclaration::from_parts(locators, reader.clone());
        let expected = reader.unwrap_or(ReaderKind::XML);
        prop_assert_eq!(decl.reader(), &expected);
    }

    /// 分解して再構築すると同じ宣言になる
    #[test]
    fn prop_parts_roundtrip(
        locators in prop::collection::vec(locator_strategy(), 1..6),
        reader in reader_strategy()
    ) {
        let decl = ImportDeclaration::from_parts(locators, reader);
        let (locators, reader) = decl.clone().into_parts();
        let rebuilt = ImportDeclaration::from_parts(locators, Some(reader));
        prop_assert_eq!(rebuilt, decl);
    }
}
