//! Asset classification and bundle size breakdown.

use crate::parser::RawAsset;
use crate::report::types::{CategoryBreakdown, SizeBreakdown, TotalBytes};

/// Extensions classified as images, matched case-insensitively.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp"];

/// Mutually exclusive asset categories, decided by filename extension.
/// Every asset lands in exactly one category; anything unrecognized is
/// [`AssetCategory::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetCategory {
    Javascript,
    Css,
    Html,
    Image,
    Other,
}

/// Classifies an asset filename by its final extension.
pub fn classify(name: &str) -> AssetCategory {
    let ext = name.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("js") => AssetCategory::Javascript,
        Some("css") => AssetCategory::Css,
        Some("html") => AssetCategory::Html,
        Some(e) if IMAGE_EXTENSIONS.contains(&e) => AssetCategory::Image,
        _ => AssetCategory::Other,
    }
}

#[derive(Default)]
struct CategoryAcc {
    bytes: u64,
    files: Vec<String>,
}

impl CategoryAcc {
    fn push(&mut self, asset: &RawAsset) {
        self.bytes += asset.size;
        self.files.push(asset.name.clone());
    }

    fn into_breakdown(self, total: u64) -> CategoryBreakdown {
        CategoryBreakdown {
            percentage: percentage_of(self.bytes, total),
            bytes: self.bytes,
            files: self.files,
        }
    }
}

/// Share of `total` in percent, rounded to one decimal place. A zero total
/// yields 0.0 rather than NaN.
fn percentage_of(bytes: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (bytes as f64 / total as f64 * 100.0 * 10.0).round() / 10.0
}

/// Groups a bundle's assets into the [`SizeBreakdown`] stored on the report.
///
/// File lists keep their input order; percentages are computed against the
/// grand total of all assets.
pub fn size_breakdown(assets: &[RawAsset]) -> SizeBreakdown {
    let total: u64 = assets.iter().map(|a| a.size).sum();

    let mut javascript = CategoryAcc::default();
    let mut css = CategoryAcc::default();
    let mut html = CategoryAcc::default();
    let mut images = CategoryAcc::default();
    let mut other = CategoryAcc::default();

    for asset in assets {
        match classify(&asset.name) {
            AssetCategory::Javascript => javascript.push(asset),
            AssetCategory::Css => css.push(asset),
            AssetCategory::Html => html.push(asset),
            AssetCategory::Image => images.push(asset),
            AssetCategory::Other => other.push(asset),
        }
    }

    SizeBreakdown {
        total: TotalBytes { bytes: total },
        javascript: javascript.into_breakdown(total),
        css: css.into_breakdown(total),
        html: html.into_breakdown(total),
        images: images.into_breakdown(total),
        other: other.into_breakdown(total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(name: &str, size: u64) -> RawAsset {
        RawAsset {
            name: name.to_string(),
            size,
        }
    }

    #[test]
    fn test_classify_by_extension() {
        assert_eq!(classify("js/app.3c51ab.js"), AssetCategory::Javascript);
        assert_eq!(classify("css/app.css"), AssetCategory::Css);
        assert_eq!(classify("index.html"), AssetCategory::Html);
        assert_eq!(classify("img/logo.png"), AssetCategory::Image);
        assert_eq!(classify("img/photo.jpeg"), AssetCategory::Image);
        assert_eq!(classify("favicon.ico"), AssetCategory::Other);
        assert_eq!(classify("no_extension"), AssetCategory::Other);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify("BANNER.PNG"), AssetCategory::Image);
        assert_eq!(classify("APP.JS"), AssetCategory::Javascript);
        assert_eq!(classify("logo.SvG"), AssetCategory::Image);
    }

    #[test]
    fn test_classify_uses_final_extension_only() {
        assert_eq!(classify("bundle.js.map"), AssetCategory::Other);
        assert_eq!(classify("archive.tar.gz"), AssetCategory::Other);
        assert_eq!(classify("min.js.html"), AssetCategory::Html);
    }

    #[test]
    fn test_breakdown_partitions_every_asset() {
        let assets = vec![
            asset("a.js", 300),
            asset("b.css", 100),
            asset("c.html", 50),
            asset("d.webp", 25),
            asset("e.wasm", 525),
        ];

        let breakdown = size_breakdown(&assets);

        let category_total = breakdown.javascript.bytes
            + breakdown.css.bytes
            + breakdown.html.bytes
            + breakdown.images.bytes
            + breakdown.other.bytes;
        assert_eq!(category_total, breakdown.total.bytes);
        assert_eq!(breakdown.total.bytes, 1000);

        let file_count = breakdown.javascript.files.len()
            + breakdown.css.files.len()
            + breakdown.html.files.len()
            + breakdown.images.files.len()
            + breakdown.other.files.len();
        assert_eq!(file_count, assets.len());
    }

    #[test]
    fn test_percentage_rounds_to_one_decimal() {
        let assets = vec![asset("a.js", 300), asset("b.css", 100), asset("c.bin", 600)];

        let breakdown = size_breakdown(&assets);

        assert_eq!(breakdown.javascript.percentage, 30.0);
        assert_eq!(breakdown.css.percentage, 10.0);
        assert_eq!(breakdown.other.percentage, 60.0);
    }

    #[test]
    fn test_percentage_rounding_is_independent() {
        // Three equal thirds each round to 33.3; the sum is not 100.
        let assets = vec![asset("a.js", 1), asset("b.css", 1), asset("c.html", 1)];

        let breakdown = size_breakdown(&assets);

        assert_eq!(breakdown.javascript.percentage, 33.3);
        assert_eq!(breakdown.css.percentage, 33.3);
        assert_eq!(breakdown.html.percentage, 33.3);
    }

    #[test]
    fn test_zero_total_yields_zero_percentages() {
        let breakdown = size_breakdown(&[asset("a.js", 0)]);

        assert_eq!(breakdown.total.bytes, 0);
        assert_eq!(breakdown.javascript.percentage, 0.0);
        assert_eq!(breakdown.other.percentage, 0.0);
    }

    #[test]
    fn test_files_keep_input_order() {
        let assets = vec![
            asset("js/z.js", 1),
            asset("js/a.js", 1),
            asset("js/m.js", 1),
        ];

        let breakdown = size_breakdown(&assets);

        assert_eq!(breakdown.javascript.files, vec!["js/z.js", "js/a.js", "js/m.js"]);
    }
}
