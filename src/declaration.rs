//! リソースインポート宣言
//!
//! 構成ユニットに付与され、外部の定義リソース（XML ファイル等）と
//! それを解釈するリーダー種別を保持する。宣言自体は何も実行しない。
//! 解釈は [`crate::processor::ConfigurationProcessor`] が行う。

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// 定義リーダーの種別識別子
///
/// 組み込みは [`ReaderKind::XML`] と [`ReaderKind::PROPERTIES`]。
/// それ以外は [`ReaderKind::custom`] で作成し、処理前に
/// [`crate::reader::ReaderFactory`] へ登録しておく必要がある。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReaderKind(Cow<'static, str>);

impl ReaderKind {
    /// `<beans>` XML ドキュメント用リーダー
    pub const XML: ReaderKind = ReaderKind(Cow::Borrowed("xml"));

    /// `.properties` 形式用リーダー
    pub const PROPERTIES: ReaderKind = ReaderKind(Cow::Borrowed("properties"));

    /// 任意の識別子を作成（大文字小文字を含めそのまま保持）
    pub fn custom(name: impl Into<String>) -> Self {
        ReaderKind(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ReaderKind {
    fn default() -> Self {
        ReaderKind::XML
    }
}

impl fmt::Display for ReaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReaderKind {
    fn from(name: &str) -> Self {
        match name {
            "xml" => ReaderKind::XML,
            "properties" => ReaderKind::PROPERTIES,
            other => ReaderKind::custom(other),
        }
    }
}

/// リソースインポート宣言
///
/// - `locators`: 処理順に並んだリソースロケーション
/// - `reader`: 全ロケーションに適用するリーダー種別
///
/// 生成後は変更できない。ロケーションが空であることはここでは検査せず、
/// プロセッサが構成エラーとして報告する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDeclaration {
    #[serde(rename = "locations")]
    locators: Vec<String>,
    #[serde(default)]
    reader: ReaderKind,
}

impl ImportDeclaration {
    /// デフォルトの XML リーダーで宣言を作成
    pub fn new<I, S>(locators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_parts(locators.into_iter().map(Into::into).collect(), None)
    }

    /// ロケーションとリーダー種別（省略時は XML）から作成
    pub fn from_parts(locators: Vec<String>, reader: Option<ReaderKind>) -> Self {
        Self {
            locators,
            reader: reader.unwrap_or_default(),
        }
    }

    /// リーダー種別を指定した宣言を返す
    pub fn with_reader(self, reader: ReaderKind) -> Self {
        Self::from_parts(self.locators, Some(reader))
    }

    pub fn locators(&self) -> &[String] {
        &self.locators
    }

    pub fn reader(&self) -> &ReaderKind {
        &self.reader
    }

    /// `(locators, reader)` に分解
    pub fn into_parts(self) -> (Vec<String>, ReaderKind) {
        (self.locators, self.reader)
    }
}

#[cfg(test)]
#[path = "declaration_test.rs"]
mod tests;

#[cfg(test)]
#[path = "declaration_proptests.rs"]
mod proptests;
