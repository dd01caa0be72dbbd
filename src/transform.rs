//! Transformation request building: the engine only constructs URL parameters
//! for the external media service; it never interprets the transformation.
//!
//! The original ad hoc embedded-JSON transformation log is replaced with a
//! structured history list; resetting crop/transform history is `clear()`.

use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformOp {
    Resize { width: u32, height: u32 },
    CropRegion { x: u32, y: u32, width: u32, height: u32 },
    RemoveBackground,
    ExtendBackground { width: u32, height: u32 },
    Rotate { degrees: i32 },
    Grayscale,
}

impl TransformOp {
    fn write_params(&self, out: &mut String) {
        match *self {
            Self::Resize { width, height } => {
                let _ = write!(out, "w-{width},h-{height}");
            }
            Self::CropRegion {
                x,
                y,
                width,
                height,
            } => {
                let _ = write!(out, "x-{x},y-{y},w-{width},h-{height},cm-extract");
            }
            Self::RemoveBackground => out.push_str("e-bgremove"),
            Self::ExtendBackground { width, height } => {
                let _ = write!(out, "w-{width},h-{height},cm-pad_resize,bg-genfill");
            }
            Self::Rotate { degrees } => {
                let _ = write!(out, "rt-{degrees}");
            }
            Self::Grayscale => out.push_str("e-grayscale"),
        }
    }
}

/// Appends chained transformation parameters to `base_url`. Each operation
/// becomes one chain step; steps apply in order, separated by `:`.
pub fn build_transformed_url(base_url: &str, operations: &[TransformOp]) -> String {
    if operations.is_empty() {
        return base_url.to_string();
    }

    let mut params = String::new();
    for (index, op) in operations.iter().enumerate() {
        if index > 0 {
            params.push(':');
        }
        op.write_params(&mut params);
    }

    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!("{base_url}{separator}tr={params}")
}

/// Ordered transformation history for one image resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformHistory {
    operations: Vec<TransformOp>,
}

impl TransformHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: TransformOp) {
        self.operations.push(op);
    }

    pub fn operations(&self) -> &[TransformOp] {
        &self.operations
    }

    /// Discards all recorded transformations (the "reset" affordance).
    pub fn clear(&mut self) {
        self.operations.clear();
    }

    pub fn url_for(&self, base_url: &str) -> String {
        build_transformed_url(base_url, &self.operations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://ik.example.com/demo/photo.jpg";

    #[test]
    fn empty_operations_return_base_url_unchanged() {
        assert_eq!(build_transformed_url(BASE, &[]), BASE);
    }

    #[test]
    fn single_resize_appends_query_parameter() {
        let url = build_transformed_url(
            BASE,
            &[TransformOp::Resize {
                width: 300,
                height: 200,
            }],
        );
        assert_eq!(url, format!("{BASE}?tr=w-300,h-200"));
    }

    #[test]
    fn chained_operations_join_with_colon_in_order() {
        let url = build_transformed_url(
            BASE,
            &[
                TransformOp::CropRegion {
                    x: 100,
                    y: 50,
                    width: 200,
                    height: 150,
                },
                TransformOp::RemoveBackground,
            ],
        );
        assert_eq!(
            url,
            format!("{BASE}?tr=x-100,y-50,w-200,h-150,cm-extract:e-bgremove")
        );
    }

    #[test]
    fn existing_query_string_extends_with_ampersand() {
        let url = build_transformed_url(
            "https://ik.example.com/photo.jpg?v=2",
            &[TransformOp::Grayscale],
        );
        assert_eq!(url, "https://ik.example.com/photo.jpg?v=2&tr=e-grayscale");
    }

    #[test]
    fn history_accumulates_and_clears() {
        let mut history = TransformHistory::new();
        history.push(TransformOp::RemoveBackground);
        history.push(TransformOp::ExtendBackground {
            width: 1600,
            height: 900,
        });
        assert_eq!(history.operations().len(), 2);
        assert_eq!(
            history.url_for(BASE),
            format!("{BASE}?tr=e-bgremove:w-1600,h-900,cm-pad_resize,bg-genfill")
        );

        history.clear();
        assert_eq!(history.url_for(BASE), BASE);
    }
}
