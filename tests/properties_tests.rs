//! Randomized properties of the indexing and set operations.

use hexsphere::{
  cell_to_children, cell_to_geo, cell_to_parent, compact, geo_to_cell, uncompact, GeoCoord, MAX_RESOLUTION,
};
use proptest::prelude::*;

prop_compose! {
  fn arb_geo()(lat in -89.9f64..89.9, lng in -179.9f64..179.9) -> GeoCoord {
    GeoCoord::from_degrees(lat, lng)
  }
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(64))]

  #[test]
  fn geo_roundtrip_idempotent(geo in arb_geo(), res in 0i32..=MAX_RESOLUTION) {
    let cell = geo_to_cell(&geo, res).unwrap();
    prop_assert!(cell.is_valid_cell());
    prop_assert_eq!(cell.resolution(), res);

    let center = cell_to_geo(cell).unwrap();
    prop_assert_eq!(geo_to_cell(&center, res).unwrap(), cell);
  }

  #[test]
  fn parent_child_inverse(geo in arb_geo(), res in 1i32..=MAX_RESOLUTION) {
    let cell = geo_to_cell(&geo, res).unwrap();
    let parent = cell_to_parent(cell, res - 1).unwrap();
    prop_assert!(cell_to_children(parent, res).unwrap().contains(&cell));
  }

  #[test]
  fn compact_uncompact_inverse(geo in arb_geo(), res in 0i32..=10) {
    let cell = geo_to_cell(&geo, res).unwrap();
    let mut set = cell_to_children(cell, (res + 2).min(MAX_RESOLUTION)).unwrap();
    set.sort_unstable();

    let compacted = compact(&set).unwrap();
    let mut expanded = uncompact(&compacted, (res + 2).min(MAX_RESOLUTION)).unwrap();
    expanded.sort_unstable();
    prop_assert_eq!(expanded, set);
  }

  #[test]
  fn string_roundtrip(geo in arb_geo(), res in 0i32..=MAX_RESOLUTION) {
    let cell = geo_to_cell(&geo, res).unwrap();
    prop_assert_eq!(cell.to_string().parse(), Ok(cell));
  }
}
