//! Histogram files: the serde form of `Hist1D` / `Hist2D`, tagged by `"dim"`.

use std::path::Path;

use anyhow::Result;
use fh_hist::{Hist1D, Hist2D};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "dim")]
pub enum HistFile {
    #[serde(rename = "1d", alias = "1D")]
    One(Hist1D),
    #[serde(rename = "2d", alias = "2D")]
    Two(Hist2D),
}

impl HistFile {
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
        let hist: HistFile = serde_json::from_str(&text)
            .map_err(|e| anyhow::anyhow!("invalid histogram file {}: {e}", path.display()))?;
        match &hist {
            HistFile::One(h) => {
                tracing::info!(path = %path.display(), bins = h.n_bins(), "loaded 1D histogram")
            }
            HistFile::Two(h) => tracing::info!(
                path = %path.display(),
                x_bins = h.x_edges().len() - 1,
                y_bins = h.y_edges().len() - 1,
                "loaded 2D histogram"
            ),
        }
        Ok(hist)
    }

    /// The 1D histogram, or an error naming `path`.
    pub fn into_1d(self, path: &Path) -> Result<Hist1D> {
        match self {
            HistFile::One(h) => Ok(h),
            HistFile::Two(_) => {
                anyhow::bail!("{} holds a 2D histogram, expected 1D", path.display())
            }
        }
    }
}

pub fn read_1d(path: &Path) -> Result<Hist1D> {
    HistFile::read(path)?.into_1d(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_by_dim() {
        let one: HistFile =
            serde_json::from_str(r#"{"dim":"1d","bin_edges":[0,1,2],"bin_counts":[1,2]}"#)
                .unwrap();
        assert!(matches!(one, HistFile::One(ref h) if h.n_bins() == 2));

        let two: HistFile = serde_json::from_str(
            r#"{"dim":"2d","x_edges":[0,1],"y_edges":[0,1,2],"counts":[[1,2]]}"#,
        )
        .unwrap();
        assert!(matches!(two, HistFile::Two(_)));

        let untagged = r#"{"bin_edges":[0,1],"bin_counts":[1]}"#;
        assert!(serde_json::from_str::<HistFile>(untagged).is_err());
    }

    #[test]
    fn serialized_form_carries_the_tag() {
        let h = Hist1D::from_counts(vec![0.0, 1.0], vec![3.0], None).unwrap();
        let json = serde_json::to_value(HistFile::One(h)).unwrap();
        assert_eq!(json["dim"], "1d");
    }
}
