//! Common types and data structures

use chrono::{DateTime, Utc};
use eframe::egui;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::PathBuf;

/// Normalized bounding boxes use a fixed 0-1000 scale on both axes,
/// independent of actual pixel dimensions.
pub const BBOX_SCALE: f32 = 1000.0;

/// Design discipline the model assigns to each part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DesignCategory {
    #[serde(rename = "Smart Design")]
    Smart,
    #[serde(rename = "Entertainment Design")]
    Entertainment,
    #[serde(rename = "Hybrid Design")]
    Hybrid,
}

impl DesignCategory {
    /// Display order for the part list: engineering first, experience last
    pub const ALL: [DesignCategory; 3] = [Self::Smart, Self::Hybrid, Self::Entertainment];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Smart => "Smart Design",
            Self::Entertainment => "Entertainment Design",
            Self::Hybrid => "Hybrid Design",
        }
    }

    pub fn tagline(&self) -> &'static str {
        match self {
            Self::Smart => "Logic • Efficiency • Structure",
            Self::Entertainment => "Experience • Comfort • Style",
            Self::Hybrid => "Integration • Synergy",
        }
    }
}

/// Rectangle on the normalized 0-1000 scale, stored as [ymin, xmin, ymax, xmax]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub ymin: f32,
    pub xmin: f32,
    pub ymax: f32,
    pub xmax: f32,
}

impl BoundingBox {
    /// Accepts exactly four numbers in [ymin, xmin, ymax, xmax] order
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        match values {
            [ymin, xmin, ymax, xmax] => Some(Self {
                ymin: *ymin as f32,
                xmin: *xmin as f32,
                ymax: *ymax as f32,
                xmax: *xmax as f32,
            }),
            _ => None,
        }
    }

    /// Area in normalized units, used for overlay z-ordering
    pub fn area(&self) -> f32 {
        (self.ymax - self.ymin) * (self.xmax - self.xmin)
    }

    /// Map normalized coordinates onto an on-screen frame by linear scaling
    pub fn rect_within(&self, frame: egui::Rect) -> egui::Rect {
        let sx = frame.width() / BBOX_SCALE;
        let sy = frame.height() / BBOX_SCALE;
        egui::Rect::from_min_max(
            egui::pos2(frame.left() + self.xmin * sx, frame.top() + self.ymin * sy),
            egui::pos2(frame.left() + self.xmax * sx, frame.top() + self.ymax * sy),
        )
    }
}

fn bbox_from_array<'de, D>(deserializer: D) -> Result<Option<BoundingBox>, D::Error>
where
    D: Deserializer<'de>,
{
    // A wrong-length array degrades to "no box" rather than failing the response
    let raw: Option<Vec<f64>> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(BoundingBox::from_slice))
}

fn bbox_to_array<S>(bbox: &Option<BoundingBox>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match bbox {
        Some(b) => [b.ymin, b.xmin, b.ymax, b.xmax].serialize(serializer),
        None => serializer.serialize_none(),
    }
}

/// One identified part from the model's response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedPart {
    pub id: String,
    pub name: String,
    pub category: DesignCategory,
    pub description: String,
    pub skills: Vec<String>,
    pub reasoning: String,
    #[serde(
        default,
        deserialize_with = "bbox_from_array",
        serialize_with = "bbox_to_array"
    )]
    pub bounding_box: Option<BoundingBox>,
}

/// Parsed model response: overview text plus the ordered part list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub overview: String,
    pub parts: Vec<AnalyzedPart>,
    /// Stamped when the response is parsed; not part of the wire contract
    #[serde(default = "Utc::now", skip_serializing)]
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisResult {
    /// Parts belonging to one category, preserving response order
    pub fn parts_in(&self, category: DesignCategory) -> impl Iterator<Item = &AnalyzedPart> {
        self.parts.iter().filter(move |p| p.category == category)
    }

    pub fn part(&self, id: &str) -> Option<&AnalyzedPart> {
        self.parts.iter().find(|p| p.id == id)
    }

    /// Indices of boxed parts, largest area first, so the overlay paints
    /// small boxes last and they win hit-testing over the ones beneath
    pub fn overlay_order(&self) -> Vec<usize> {
        let area = |i: usize| {
            self.parts[i]
                .bounding_box
                .map(|b| b.area())
                .unwrap_or(0.0)
        };
        let mut order: Vec<usize> = (0..self.parts.len())
            .filter(|&i| self.parts[i].bounding_box.is_some())
            .collect();
        order.sort_by(|&a, &b| area(b).total_cmp(&area(a)));
        order
    }
}

/// Where the image under analysis came from
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    Preset { url: String, label: String },
    Upload(PathBuf),
}

impl ImageSource {
    pub fn display_name(&self) -> String {
        match self {
            Self::Preset { label, .. } => label.clone(),
            Self::Upload(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "uploaded image".to_string()),
        }
    }
}

/// Base64 payload ready for the model call
#[derive(Clone)]
pub struct EncodedImage {
    pub data: String,
    pub mime_type: String,
}

/// Transient holder for the image currently on screen
#[derive(Default)]
pub struct ImageState {
    pub source: Option<ImageSource>,
    pub texture: Option<egui::TextureHandle>,
    pub encoded: Option<EncodedImage>,
}

impl ImageState {
    pub fn clear(&mut self) {
        self.source = None;
        self.texture = None;
        self.encoded = None;
    }
}

/// Decoded RGBA pixels, handed to the UI thread for texture upload
pub struct DecodedImage {
    pub size: [usize; 2],
    pub rgba: Vec<u8>,
}

/// Progress of the single background analysis job
#[derive(Clone, PartialEq)]
pub enum AnalysisPhase {
    Idle,
    Fetching(u64, u64), // (received_bytes, total_bytes)
    Encoding,
    Analyzing,
    Complete,
    Failed(String),
}

/// Shared slot the background task publishes into
#[derive(Default)]
pub struct AnalysisJob {
    pub phase: AnalysisPhase,
    pub image: Option<DecodedImage>,
    pub encoded: Option<EncodedImage>,
    pub result: Option<AnalysisResult>,
}

impl Default for AnalysisPhase {
    fn default() -> Self {
        Self::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(id: &str, category: DesignCategory, bbox: Option<[f64; 4]>) -> AnalyzedPart {
        AnalyzedPart {
            id: id.to_string(),
            name: id.to_uppercase(),
            category,
            description: String::new(),
            skills: vec![],
            reasoning: String::new(),
            bounding_box: bbox.and_then(|b| BoundingBox::from_slice(&b)),
        }
    }

    fn result(parts: Vec<AnalyzedPart>) -> AnalysisResult {
        AnalysisResult {
            overview: String::new(),
            parts,
            analyzed_at: Utc::now(),
        }
    }

    #[test]
    fn bbox_requires_exactly_four_numbers() {
        assert!(BoundingBox::from_slice(&[0.0, 0.0, 10.0, 10.0]).is_some());
        assert!(BoundingBox::from_slice(&[]).is_none());
        assert!(BoundingBox::from_slice(&[1.0, 2.0, 3.0]).is_none());
        assert!(BoundingBox::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]).is_none());
    }

    #[test]
    fn bbox_order_is_ymin_xmin_ymax_xmax() {
        let b = BoundingBox::from_slice(&[100.0, 200.0, 300.0, 400.0]).unwrap();
        assert_eq!(b.ymin, 100.0);
        assert_eq!(b.xmin, 200.0);
        assert_eq!(b.ymax, 300.0);
        assert_eq!(b.xmax, 400.0);
    }

    #[test]
    fn rect_mapping_is_linear() {
        // 500/1000 and 250/1000 are exactly representable scale factors
        let frame = egui::Rect::from_min_size(egui::pos2(10.0, 20.0), egui::vec2(500.0, 250.0));
        let b = BoundingBox::from_slice(&[250.0, 100.0, 750.0, 900.0]).unwrap();
        let r = b.rect_within(frame);
        // each edge is frame origin plus frame extent times coordinate/1000
        assert_eq!(r.left(), 60.0);
        assert_eq!(r.right(), 460.0);
        assert_eq!(r.top(), 82.5);
        assert_eq!(r.bottom(), 207.5);
    }

    #[test]
    fn rect_mapping_is_monotonic() {
        let frame = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(640.0, 480.0));
        let mut last_left = f32::NEG_INFINITY;
        for xmin in [0.0, 125.0, 250.0, 500.0, 999.0] {
            let b = BoundingBox::from_slice(&[0.0, xmin, 1000.0, 1000.0]).unwrap();
            let left = b.rect_within(frame).left();
            assert!(left > last_left, "xmin={xmin} produced non-increasing left");
            last_left = left;
        }
    }

    #[test]
    fn full_box_fills_the_frame() {
        let frame = egui::Rect::from_min_size(egui::pos2(5.0, 7.0), egui::vec2(500.0, 250.0));
        let b = BoundingBox::from_slice(&[0.0, 0.0, 1000.0, 1000.0]).unwrap();
        assert_eq!(b.rect_within(frame), frame);
    }

    #[test]
    fn partition_covers_every_part_once() {
        let r = result(vec![
            part("a", DesignCategory::Smart, None),
            part("b", DesignCategory::Entertainment, None),
            part("c", DesignCategory::Hybrid, None),
            part("d", DesignCategory::Smart, None),
        ]);
        let total: usize = DesignCategory::ALL
            .iter()
            .map(|&c| r.parts_in(c).count())
            .sum();
        assert_eq!(total, r.parts.len());

        let smart: Vec<&str> = r
            .parts_in(DesignCategory::Smart)
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(smart, ["a", "d"]);
    }

    #[test]
    fn overlay_order_is_descending_by_area() {
        let r = result(vec![
            part("small", DesignCategory::Smart, Some([0.0, 0.0, 10.0, 10.0])),
            part("large", DesignCategory::Smart, Some([0.0, 0.0, 500.0, 500.0])),
            part("unboxed", DesignCategory::Hybrid, None),
            part(
                "medium",
                DesignCategory::Entertainment,
                Some([0.0, 0.0, 100.0, 100.0]),
            ),
        ]);
        let order: Vec<&str> = r
            .overlay_order()
            .into_iter()
            .map(|i| r.parts[i].id.as_str())
            .collect();
        assert_eq!(order, ["large", "medium", "small"]);
    }

    #[test]
    fn overlay_order_is_stable_for_equal_areas() {
        let r = result(vec![
            part("first", DesignCategory::Smart, Some([0.0, 0.0, 50.0, 50.0])),
            part(
                "second",
                DesignCategory::Smart,
                Some([100.0, 100.0, 150.0, 150.0]),
            ),
            part(
                "third",
                DesignCategory::Smart,
                Some([200.0, 200.0, 250.0, 250.0]),
            ),
        ]);
        let order: Vec<&str> = r
            .overlay_order()
            .into_iter()
            .map(|i| r.parts[i].id.as_str())
            .collect();
        assert_eq!(order, ["first", "second", "third"]);
    }

    #[test]
    fn part_deserializes_with_camel_case_box() {
        let json = r#"{
            "id": "battery",
            "name": "Battery Pack",
            "category": "Smart Design",
            "description": "Stores energy.",
            "skills": ["Electrical Engineering", "Thermal Design"],
            "reasoning": "Purely functional component.",
            "boundingBox": [120, 80, 340, 400]
        }"#;
        let p: AnalyzedPart = serde_json::from_str(json).unwrap();
        assert_eq!(p.category, DesignCategory::Smart);
        let b = p.bounding_box.unwrap();
        assert_eq!((b.ymin, b.xmin, b.ymax, b.xmax), (120.0, 80.0, 340.0, 400.0));
    }

    #[test]
    fn wrong_length_box_degrades_to_none() {
        let json = r#"{
            "id": "trim",
            "name": "Trim",
            "category": "Entertainment Design",
            "description": "",
            "skills": [],
            "reasoning": "",
            "boundingBox": [1, 2, 3]
        }"#;
        let p: AnalyzedPart = serde_json::from_str(json).unwrap();
        assert!(p.bounding_box.is_none());
    }

    #[test]
    fn unknown_category_is_rejected() {
        let json = r#"{
            "id": "x",
            "name": "X",
            "category": "Industrial Design",
            "description": "",
            "skills": [],
            "reasoning": ""
        }"#;
        assert!(serde_json::from_str::<AnalyzedPart>(json).is_err());
    }

    #[test]
    fn analysis_result_parses_without_timestamp() {
        let json = r#"{"overview": "Two sentences.", "parts": []}"#;
        let r: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(r.overview, "Two sentences.");
        assert!(r.parts.is_empty());
    }
}
