//! Scale reversal properties.

use abs_model::ScaleWidth;
use abs_transform::reverse;
use proptest::prelude::*;

fn width() -> impl Strategy<Value = ScaleWidth> {
    prop_oneof![
        Just(ScaleWidth::Four),
        Just(ScaleWidth::Five),
        Just(ScaleWidth::Six),
    ]
}

proptest! {
    #[test]
    fn reversal_is_an_involution_in_range(width in width(), offset in 0i64..6) {
        let v = 1 + offset % width.levels();
        prop_assert_eq!(reverse(reverse(Some(v), width), width), Some(v));
    }

    #[test]
    fn reversal_stays_on_the_scale(width in width(), v in -5i64..120) {
        match reverse(Some(v), width) {
            Some(out) => {
                prop_assert!(width.contains(v));
                prop_assert!(width.contains(out));
            }
            None => prop_assert!(!width.contains(v)),
        }
    }
}

#[test]
fn reversal_idempotence_for_every_width_and_level() {
    for width in [ScaleWidth::Four, ScaleWidth::Five, ScaleWidth::Six] {
        for v in 1..=width.levels() {
            assert_eq!(reverse(reverse(Some(v), width), width), Some(v));
        }
    }
}

#[test]
fn reversal_out_of_range_is_absent() {
    assert_eq!(reverse(Some(0), ScaleWidth::Four), None);
    assert_eq!(reverse(Some(5), ScaleWidth::Four), None);
    assert_eq!(reverse(Some(7), ScaleWidth::Six), None);
    assert_eq!(reverse(Some(98), ScaleWidth::Five), None);
}

#[test]
fn six_point_reversal_maps_endpoints() {
    assert_eq!(reverse(Some(1), ScaleWidth::Six), Some(6));
    assert_eq!(reverse(Some(3), ScaleWidth::Six), Some(4));
}
