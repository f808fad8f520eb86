//! Table-driven crop window cases covering both branches, overrun shifts and
//! both rounding rules.

use loopalign::{crop_window, parse_ratio, CropBranch, Point, Rect, Rounding};
use serde::Deserialize;

const CASES_JSON: &str = r#"[
  { "id": "square_16_9", "min_width": 900, "min_height": 900, "ratio": "16:9",
    "anchor": [500.0, 500.0], "rounding": "even",
    "branch": "height", "rect": [0, 247, 900, 753] },
  { "id": "tall_3_2", "min_width": 90, "min_height": 400, "ratio": "1.5",
    "anchor": [10.0, 100.0], "rounding": "even",
    "branch": "width", "rect": [33, 0, 167, 90] },
  { "id": "tie_even", "min_width": 400, "min_height": 100, "ratio": "1",
    "anchor": [100.5, 0.0], "rounding": "even",
    "branch": "height", "rect": [0, 50, 100, 150] },
  { "id": "tie_away", "min_width": 400, "min_height": 100, "ratio": "1",
    "anchor": [100.5, 0.0], "rounding": "away",
    "branch": "height", "rect": [0, 51, 100, 151] },
  { "id": "left_overrun", "min_width": 200, "min_height": 97, "ratio": "1:1",
    "anchor": [5.0, 48.0], "rounding": "even",
    "branch": "height", "rect": [0, 0, 97, 96] },
  { "id": "bottom_overrun", "min_width": 100, "min_height": 300, "ratio": "2",
    "anchor": [50.0, 280.0], "rounding": "even",
    "branch": "width", "rect": [100, 0, 300, 100] },
  { "id": "top_overrun_negative_tie", "min_width": 100, "min_height": 300, "ratio": "2/1",
    "anchor": [50.0, -20.5], "rounding": "away",
    "branch": "width", "rect": [0, 0, 200, 100] }
]"#;

#[derive(Debug, Deserialize)]
struct Case {
    id: String,
    min_width: usize,
    min_height: usize,
    ratio: String,
    anchor: [f64; 2],
    rounding: String,
    branch: String,
    rect: [usize; 4],
}

fn rounding(name: &str) -> Rounding {
    match name {
        "even" => Rounding::TiesToEven,
        "away" => Rounding::TiesAwayFromZero,
        other => panic!("unknown rounding {other}"),
    }
}

fn branch(name: &str) -> CropBranch {
    match name {
        "width" => CropBranch::WidthConstrained,
        "height" => CropBranch::HeightConstrained,
        other => panic!("unknown branch {other}"),
    }
}

#[test]
fn crop_windows_match_table() {
    let cases: Vec<Case> = serde_json::from_str(CASES_JSON).unwrap();
    assert!(!cases.is_empty());

    for case in cases {
        let ratio = parse_ratio(&case.ratio).unwrap();
        let anchor = Point::new(case.anchor[0], case.anchor[1]);
        let window = crop_window(
            case.min_width,
            case.min_height,
            ratio,
            anchor,
            rounding(&case.rounding),
        )
        .unwrap_or_else(|err| panic!("{}: {err}", case.id));

        let [top, left, bottom, right] = case.rect;
        assert_eq!(window.branch, branch(&case.branch), "{}", case.id);
        assert_eq!(
            window.rect,
            Rect::new(top, left, bottom, right).unwrap(),
            "{}",
            case.id
        );
        assert!(
            window.rect.fits_within(case.min_width, case.min_height),
            "{}",
            case.id
        );
    }
}
