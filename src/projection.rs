//! Icosahedral gnomonic projection.
//!
//! Converts between spherical coordinates, unit-sphere 3-D points, and the
//! planar hex coordinate system of the nearest icosahedron face. The
//! projection constant, the sqrt(7)-per-resolution scaling and the Class III
//! axes rotation must be applied exactly in this order; cell encoding at
//! face boundaries is sensitive to the relative order of operations.

use crate::constants::{
  is_class_iii, EPSILON, INV_RES0_U_GNOMONIC, M_AP7_ROT_RADS, M_ONETHIRD, M_RSQRT7, M_SQRT7, NUM_FACES,
  RES0_U_GNOMONIC,
};
use crate::geo::{pos_angle, GeoCoord};
use crate::math::{Vec2, Vec3};

/// Icosahedron face centers in lat/lng radians.
#[rustfmt::skip]
pub(crate) static FACE_CENTER_GEO: [GeoCoord; NUM_FACES as usize] = [
    GeoCoord::new( 0.803_582_649_718_989_94,  1.248_397_419_617_396),     // face 0
    GeoCoord::new( 1.307_747_883_455_638_2,   2.536_945_009_877_921),     // face 1
    GeoCoord::new( 1.054_751_253_523_952,    -1.347_517_358_900_396_6),   // face 2
    GeoCoord::new( 0.600_191_595_538_186_8,  -0.450_603_909_469_755_75),  // face 3
    GeoCoord::new( 0.491_715_428_198_773_87,  0.401_988_202_911_306_94),  // face 4
    GeoCoord::new( 0.172_745_327_415_618_7,   1.678_146_885_280_433_7),   // face 5
    GeoCoord::new( 0.605_929_321_571_350_7,   2.953_923_329_812_411_6),   // face 6
    GeoCoord::new( 0.427_370_518_328_979_64, -1.888_876_200_336_285_4),   // face 7
    GeoCoord::new(-0.079_066_118_549_212_83, -0.733_429_513_380_867_74),  // face 8
    GeoCoord::new(-0.230_961_644_455_383_64,  0.506_495_587_332_349),     // face 9
    GeoCoord::new( 0.079_066_118_549_212_83,  2.408_163_140_208_925_5),   // face 10
    GeoCoord::new( 0.230_961_644_455_383_64, -2.635_097_066_257_444),     // face 11
    GeoCoord::new(-0.172_745_327_415_618_7,  -1.463_445_768_309_359_5),   // face 12
    GeoCoord::new(-0.605_929_321_571_350_7,  -0.187_669_323_777_381_62),  // face 13
    GeoCoord::new(-0.427_370_518_328_979_64,  1.252_716_453_253_508),     // face 14
    GeoCoord::new(-0.600_191_595_538_186_8,   2.690_988_744_120_037_5),   // face 15
    GeoCoord::new(-0.491_715_428_198_773_87, -2.739_604_450_678_486_3),   // face 16
    GeoCoord::new(-0.803_582_649_718_989_94, -1.893_195_233_972_397),     // face 17
    GeoCoord::new(-1.307_747_883_455_638_2,  -0.604_647_643_711_872_1),   // face 18
    GeoCoord::new(-1.054_751_253_523_952,     1.794_075_294_689_396_6),   // face 19
];

/// Icosahedron face centers as x/y/z points on the unit sphere.
#[rustfmt::skip]
static FACE_CENTER_POINT: [Vec3; NUM_FACES as usize] = [
    Vec3::new( 0.219_930_779_140_460_6,   0.658_369_178_027_499_6,   0.719_847_537_892_618_2),   // face 0
    Vec3::new(-0.213_923_483_450_142_1,   0.147_817_182_955_070_3,   0.965_601_793_521_420_5),   // face 1
    Vec3::new( 0.109_262_527_878_479_7,  -0.481_195_157_287_321,     0.869_777_512_128_725_3),   // face 2
    Vec3::new( 0.742_856_730_158_679_1,  -0.359_394_167_827_802_8,   0.564_800_593_651_703_3),   // face 3
    Vec3::new( 0.811_253_470_914_096_9,   0.344_895_323_763_938_4,   0.472_138_773_641_393),     // face 4
    Vec3::new(-0.105_549_814_961_392_1,   0.979_445_729_641_141_3,   0.171_887_461_000_936_5),   // face 5
    Vec3::new(-0.807_540_757_997_009_2,   0.153_355_248_589_881_8,   0.569_526_199_488_268_8),   // face 6
    Vec3::new(-0.284_614_806_978_790_7,  -0.864_408_097_265_420_6,   0.414_479_255_247_354),     // face 7
    Vec3::new( 0.740_562_147_385_448_2,  -0.667_329_956_456_552_4,  -0.078_983_764_632_673_77),  // face 8
    Vec3::new( 0.851_230_398_647_429_3,   0.472_234_378_858_268_1,  -0.228_913_738_868_780_8),   // face 9
    Vec3::new(-0.740_562_147_385_448_1,   0.667_329_956_456_552_4,   0.078_983_764_632_673_77),  // face 10
    Vec3::new(-0.851_230_398_647_429_2,  -0.472_234_378_858_268_2,   0.228_913_738_868_780_8),   // face 11
    Vec3::new( 0.105_549_814_961_391_9,  -0.979_445_729_641_141_3,  -0.171_887_461_000_936_5),   // face 12
    Vec3::new( 0.807_540_757_997_009_2,  -0.153_355_248_589_881_9,  -0.569_526_199_488_268_8),   // face 13
    Vec3::new( 0.284_614_806_978_790_8,   0.864_408_097_265_420_4,  -0.414_479_255_247_354),     // face 14
    Vec3::new(-0.742_856_730_158_679_1,   0.359_394_167_827_802_7,  -0.564_800_593_651_703_3),   // face 15
    Vec3::new(-0.811_253_470_914_097_1,  -0.344_895_323_763_938_2,  -0.472_138_773_641_393),     // face 16
    Vec3::new(-0.219_930_779_140_460_7,  -0.658_369_178_027_499_6,  -0.719_847_537_892_618_2),   // face 17
    Vec3::new( 0.213_923_483_450_142,    -0.147_817_182_955_070_4,  -0.965_601_793_521_420_5),   // face 18
    Vec3::new(-0.109_262_527_878_479_6,   0.481_195_157_287_321,    -0.869_777_512_128_725_3),   // face 19
];

/// Face ijk axes as azimuth in radians from the face center to vertex
/// 0/1/2 respectively, Class II orientation.
#[rustfmt::skip]
pub(crate) static FACE_AXES_AZ_RADS_CII: [[f64; 3]; NUM_FACES as usize] = [
    [5.619_958_268_523_94,     3.525_563_166_130_744_5,  1.431_168_063_737_548_7],  // face 0
    [5.760_339_081_714_187,    3.665_943_979_320_991_7,  1.571_548_876_927_796],    // face 1
    [0.780_213_654_393_430_1,  4.969_003_859_179_821,    2.874_608_756_786_625_7],  // face 2
    [0.430_469_363_979_999_9,  4.619_259_568_766_391,    2.524_864_466_373_195_5],  // face 3
    [6.130_269_123_335_111,    4.035_874_020_941_916,    1.941_478_918_548_720_3],  // face 4
    [2.692_877_706_530_643,    0.598_482_604_137_447_1,  4.787_272_808_923_838],    // face 5
    [2.982_963_003_477_244,    0.888_567_901_084_048_4,  5.077_358_105_870_44],     // face 6
    [3.532_912_002_790_141,    1.438_516_900_396_945_7,  5.627_307_105_183_337],    // face 7
    [3.494_305_004_259_568,    1.399_909_901_866_372_9,  5.588_700_106_652_764],    // face 8
    [3.003_214_169_499_538_4,  0.908_819_067_106_342_9,  5.097_609_271_892_734],    // face 9
    [5.930_472_956_509_811_6,  3.836_077_854_116_616,    1.741_682_751_723_420_4],  // face 10
    [0.138_378_484_090_254_85, 4.327_168_688_876_646,    2.232_773_586_483_45],     // face 11
    [0.448_714_947_059_150_36, 4.637_505_151_845_541_5,  2.543_110_049_452_346],    // face 12
    [0.158_629_650_112_549_36, 4.347_419_854_898_94,     2.253_024_752_505_745],    // face 13
    [5.891_865_957_979_238_5,  3.797_470_855_586_043,    1.703_075_753_192_847_6],  // face 14
    [2.711_123_289_609_793_3,  0.616_728_187_216_597_8,  4.805_518_392_002_988_7],  // face 15
    [3.294_508_837_434_268,    1.200_113_735_041_073,    5.388_903_939_827_464],    // face 16
    [3.804_819_692_245_44,     1.710_424_589_852_244_5,  5.899_214_794_638_635],    // face 17
    [3.664_438_879_055_192_4,  1.570_043_776_661_997,    5.758_833_981_448_388],    // face 18
    [2.361_378_999_196_363,    0.266_983_896_803_167_6,  4.455_774_101_589_558_6],  // face 19
];

/// The face whose center is nearest the given point, and the squared
/// 3-D distance to that center.
#[must_use]
pub(crate) fn closest_face(geo: &GeoCoord) -> (i32, f64) {
  let point = Vec3::from_geo(geo);
  let mut face = 0;
  let mut sqd = 5.0;
  for (f, center) in FACE_CENTER_POINT.iter().enumerate() {
    let d = center.square_dist(&point);
    if d < sqd {
      face = f as i32;
      sqd = d;
    }
  }
  (face, sqd)
}

/// Projects a spherical coordinate onto the hex plane of its nearest face,
/// at the scale of the given resolution.
#[must_use]
pub(crate) fn geo_to_hex2d(geo: &GeoCoord, res: i32) -> (i32, Vec2) {
  let (face, sqd) = closest_face(geo);

  // cos(r) = 1 - 2*sin^2(r/2) = 1 - sqd/2
  let r = (1.0 - sqd / 2.0).clamp(-1.0, 1.0).acos();

  if r < EPSILON {
    return (face, Vec2::default());
  }

  // counter-clockwise angle from the face's Class II i-axis
  let mut theta = pos_angle(
    FACE_AXES_AZ_RADS_CII[face as usize][0] - pos_angle(FACE_CENTER_GEO[face as usize].azimuth_to(geo)),
  );

  if is_class_iii(res) {
    theta = pos_angle(theta - M_AP7_ROT_RADS);
  }

  // gnomonic scaling, then scale for the unit length of this resolution
  let mut r = r.tan() * INV_RES0_U_GNOMONIC;
  for _ in 0..res {
    r *= M_SQRT7;
  }

  (face, Vec2::new(r * theta.cos(), r * theta.sin()))
}

/// Inverse projection: a hex-plane point on the given face back to a
/// spherical coordinate. `substrate` marks the finer boundary-math grid.
#[must_use]
pub(crate) fn hex2d_to_geo(v: &Vec2, face: i32, res: i32, substrate: bool) -> GeoCoord {
  let mut r = v.mag();

  if r < EPSILON {
    return FACE_CENTER_GEO[face as usize];
  }

  let mut theta = v.y.atan2(v.x);

  // scale back to the resolution 0 unit length
  for _ in 0..res {
    r *= M_RSQRT7;
  }
  if substrate {
    r *= M_ONETHIRD;
    if is_class_iii(res) {
      r *= M_RSQRT7;
    }
  }
  r *= RES0_U_GNOMONIC;

  // inverse gnomonic scaling
  r = r.atan();

  // substrate vertices have already been adjusted for Class III
  if !substrate && is_class_iii(res) {
    theta = pos_angle(theta + M_AP7_ROT_RADS);
  }

  let az = pos_angle(FACE_AXES_AZ_RADS_CII[face as usize][0] - theta);
  FACE_CENTER_GEO[face as usize].at_azimuth_distance(az, r)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::constants::{EPSILON_RAD, M_PI_2, MAX_RESOLUTION};

  #[test]
  fn test_face_centers_project_to_origin() {
    for f in 0..NUM_FACES as usize {
      let (face, v) = geo_to_hex2d(&FACE_CENTER_GEO[f], 0);
      assert_eq!(face, f as i32, "face center {f} selects its own face");
      assert!(v.mag() < EPSILON, "face center {f} projects to the plane origin");
    }
  }

  #[test]
  fn test_closest_face_poles() {
    let (north, _) = closest_face(&GeoCoord::new(M_PI_2, 0.0));
    assert!((0..5).contains(&north), "north pole lands on a northern face");
    let (south, _) = closest_face(&GeoCoord::new(-M_PI_2, 0.0));
    assert!((15..20).contains(&south), "south pole lands on a southern face");
  }

  #[test]
  fn test_hex2d_roundtrip() {
    for f in 0..NUM_FACES as i32 {
      for res in [0, 1, 5] {
        let v = if res == 0 {
          Vec2::default()
        } else {
          Vec2::new(0.1 * f64::from(f + 1), -0.05 * f64::from(f + 1))
        };
        let geo = hex2d_to_geo(&v, f, res, false);
        let (face_rt, v_rt) = geo_to_hex2d(&geo, res);
        assert_eq!(face_rt, f, "round-trip face at res {res}");
        let tol = match res {
          0 => EPSILON,
          1 => EPSILON * 1e3,
          _ => EPSILON * 1e6,
        };
        assert!(
          (v.x - v_rt.x).abs() < tol && (v.y - v_rt.y).abs() < tol,
          "round-trip point at res {res}: {v:?} vs {v_rt:?}"
        );
      }
    }
  }

  #[test]
  fn test_degenerate_center_shortcircuit() {
    for f in 0..NUM_FACES as usize {
      for res in 0..=MAX_RESOLUTION {
        let geo = hex2d_to_geo(&Vec2::default(), f as i32, res, false);
        assert!(
          geo.almost_eq_threshold(&FACE_CENTER_GEO[f], EPSILON_RAD),
          "zero vector maps exactly to face {f} center"
        );
      }
    }
  }
}
