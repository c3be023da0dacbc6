//! Resolution 0 base cell data.
//!
//! The 122 base cells tile the icosahedron; 12 of them are pentagons. The
//! tables here are precomputed, read-only geometry: each cell's home face
//! and coordinates, its neighbor in each digit direction, the coordinate
//! system rotation into each neighbor, and the reverse lookup from a face
//! coordinate to the base cell sitting there.

use crate::constants::{NUM_BASE_CELLS, NUM_FACES};
use crate::coords::{CubeCoord, Digit, FaceCoord};
use crate::index::CellIndex;

/// Sentinel for a missing base cell (the K direction off a pentagon).
pub(crate) const INVALID_BASE_CELL: i32 = 127;
/// Sentinel for a missing rotation count.
pub(crate) const INVALID_ROTATIONS: i32 = -1;
/// Maximum coordinate component in the res 0 reverse lookup.
pub(crate) const MAX_FACE_COORD: i32 = 2;

/// Per-base-cell data: home face address, pentagon flag, and (for
/// pentagons) the two clockwise offset faces.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BaseCellData {
  pub home: FaceCoord,
  pub is_pentagon: bool,
  pub cw_offset_faces: [i32; 2],
}

const fn bc(face: i32, i: i32, j: i32, k: i32, is_pentagon: bool, off0: i32, off1: i32) -> BaseCellData {
  BaseCellData {
    home: FaceCoord {
      face,
      coord: CubeCoord::new(i, j, k),
    },
    is_pentagon,
    cw_offset_faces: [off0, off1],
  }
}

/// Home face and coordinates for each base cell.
#[rustfmt::skip]
pub(crate) static BASE_CELL_DATA: [BaseCellData; NUM_BASE_CELLS as usize] = [
    bc( 1, 1, 0, 0, false, -1, -1), // base cell 0
    bc( 2, 1, 1, 0, false, -1, -1), // base cell 1
    bc( 1, 0, 0, 0, false, -1, -1), // base cell 2
    bc( 2, 1, 0, 0, false, -1, -1), // base cell 3
    bc( 0, 2, 0, 0, true,  -1, -1), // base cell 4 (pentagon)
    bc( 1, 1, 1, 0, false, -1, -1), // base cell 5
    bc( 1, 0, 0, 1, false, -1, -1), // base cell 6
    bc( 2, 0, 0, 0, false, -1, -1), // base cell 7
    bc( 0, 1, 0, 0, false, -1, -1), // base cell 8
    bc( 2, 0, 1, 0, false, -1, -1), // base cell 9
    bc( 1, 0, 1, 0, false, -1, -1), // base cell 10
    bc( 1, 0, 1, 1, false, -1, -1), // base cell 11
    bc( 3, 1, 0, 0, false, -1, -1), // base cell 12
    bc( 3, 1, 1, 0, false, -1, -1), // base cell 13
    bc(11, 2, 0, 0, true,   2,  6), // base cell 14 (pentagon)
    bc( 4, 1, 0, 0, false, -1, -1), // base cell 15
    bc( 0, 0, 0, 0, false, -1, -1), // base cell 16
    bc( 6, 0, 1, 0, false, -1, -1), // base cell 17
    bc( 0, 0, 0, 1, false, -1, -1), // base cell 18
    bc( 2, 0, 1, 1, false, -1, -1), // base cell 19
    bc( 7, 0, 0, 1, false, -1, -1), // base cell 20
    bc( 2, 0, 0, 1, false, -1, -1), // base cell 21
    bc( 0, 1, 1, 0, false, -1, -1), // base cell 22
    bc( 6, 0, 0, 1, false, -1, -1), // base cell 23
    bc(10, 2, 0, 0, true,   1,  5), // base cell 24 (pentagon)
    bc( 6, 0, 0, 0, false, -1, -1), // base cell 25
    bc( 3, 0, 0, 0, false, -1, -1), // base cell 26
    bc(11, 1, 0, 0, false, -1, -1), // base cell 27
    bc( 4, 1, 1, 0, false, -1, -1), // base cell 28
    bc( 3, 0, 1, 0, false, -1, -1), // base cell 29
    bc( 0, 0, 1, 1, false, -1, -1), // base cell 30
    bc( 4, 0, 0, 0, false, -1, -1), // base cell 31
    bc( 5, 0, 1, 0, false, -1, -1), // base cell 32
    bc( 0, 0, 1, 0, false, -1, -1), // base cell 33
    bc( 7, 0, 1, 0, false, -1, -1), // base cell 34
    bc(11, 1, 1, 0, false, -1, -1), // base cell 35
    bc( 7, 0, 0, 0, false, -1, -1), // base cell 36
    bc(10, 1, 0, 0, false, -1, -1), // base cell 37
    bc(12, 2, 0, 0, true,   3,  7), // base cell 38 (pentagon)
    bc( 6, 1, 0, 1, false, -1, -1), // base cell 39
    bc( 7, 1, 0, 1, false, -1, -1), // base cell 40
    bc( 4, 0, 0, 1, false, -1, -1), // base cell 41
    bc( 3, 0, 0, 1, false, -1, -1), // base cell 42
    bc( 3, 0, 1, 1, false, -1, -1), // base cell 43
    bc( 4, 0, 1, 0, false, -1, -1), // base cell 44
    bc( 6, 1, 0, 0, false, -1, -1), // base cell 45
    bc(11, 0, 0, 0, false, -1, -1), // base cell 46
    bc( 8, 0, 0, 1, false, -1, -1), // base cell 47
    bc( 5, 0, 0, 1, false, -1, -1), // base cell 48
    bc(14, 2, 0, 0, true,   0,  9), // base cell 49 (pentagon)
    bc( 5, 0, 0, 0, false, -1, -1), // base cell 50
    bc(12, 1, 0, 0, false, -1, -1), // base cell 51
    bc(10, 1, 1, 0, false, -1, -1), // base cell 52
    bc( 4, 0, 1, 1, false, -1, -1), // base cell 53
    bc(12, 1, 1, 0, false, -1, -1), // base cell 54
    bc( 7, 1, 0, 0, false, -1, -1), // base cell 55
    bc(11, 0, 1, 0, false, -1, -1), // base cell 56
    bc(10, 0, 0, 0, false, -1, -1), // base cell 57
    bc(13, 2, 0, 0, true,   4,  8), // base cell 58 (pentagon)
    bc(10, 0, 0, 1, false, -1, -1), // base cell 59
    bc(11, 0, 0, 1, false, -1, -1), // base cell 60
    bc( 9, 0, 1, 0, false, -1, -1), // base cell 61
    bc( 8, 0, 1, 0, false, -1, -1), // base cell 62
    bc( 6, 2, 0, 0, true,  11, 15), // base cell 63 (pentagon)
    bc( 8, 0, 0, 0, false, -1, -1), // base cell 64
    bc( 9, 0, 0, 1, false, -1, -1), // base cell 65
    bc(14, 1, 0, 0, false, -1, -1), // base cell 66
    bc( 5, 1, 0, 1, false, -1, -1), // base cell 67
    bc(16, 0, 1, 1, false, -1, -1), // base cell 68
    bc( 8, 1, 0, 1, false, -1, -1), // base cell 69
    bc( 5, 1, 0, 0, false, -1, -1), // base cell 70
    bc(12, 0, 0, 0, false, -1, -1), // base cell 71
    bc( 7, 2, 0, 0, true,  12, 16), // base cell 72 (pentagon)
    bc(12, 0, 1, 0, false, -1, -1), // base cell 73
    bc(10, 0, 1, 0, false, -1, -1), // base cell 74
    bc( 9, 0, 0, 0, false, -1, -1), // base cell 75
    bc(13, 1, 0, 0, false, -1, -1), // base cell 76
    bc(16, 0, 0, 1, false, -1, -1), // base cell 77
    bc(15, 0, 1, 1, false, -1, -1), // base cell 78
    bc(15, 0, 1, 0, false, -1, -1), // base cell 79
    bc(16, 0, 1, 0, false, -1, -1), // base cell 80
    bc(14, 1, 1, 0, false, -1, -1), // base cell 81
    bc(13, 1, 1, 0, false, -1, -1), // base cell 82
    bc( 5, 2, 0, 0, true,  10, 19), // base cell 83 (pentagon)
    bc( 8, 1, 0, 0, false, -1, -1), // base cell 84
    bc(14, 0, 0, 0, false, -1, -1), // base cell 85
    bc( 9, 1, 0, 1, false, -1, -1), // base cell 86
    bc(14, 0, 0, 1, false, -1, -1), // base cell 87
    bc(17, 0, 0, 1, false, -1, -1), // base cell 88
    bc(12, 0, 0, 1, false, -1, -1), // base cell 89
    bc(16, 0, 0, 0, false, -1, -1), // base cell 90
    bc(17, 0, 1, 1, false, -1, -1), // base cell 91
    bc(15, 0, 0, 1, false, -1, -1), // base cell 92
    bc(16, 1, 0, 1, false, -1, -1), // base cell 93
    bc( 9, 1, 0, 0, false, -1, -1), // base cell 94
    bc(15, 0, 0, 0, false, -1, -1), // base cell 95
    bc(13, 0, 0, 0, false, -1, -1), // base cell 96
    bc( 8, 2, 0, 0, true,  13, 17), // base cell 97 (pentagon)
    bc(13, 0, 1, 0, false, -1, -1), // base cell 98
    bc(17, 1, 0, 1, false, -1, -1), // base cell 99
    bc(19, 0, 1, 0, false, -1, -1), // base cell 100
    bc(14, 0, 1, 0, false, -1, -1), // base cell 101
    bc(19, 0, 1, 1, false, -1, -1), // base cell 102
    bc(17, 0, 1, 0, false, -1, -1), // base cell 103
    bc(13, 0, 0, 1, false, -1, -1), // base cell 104
    bc(17, 0, 0, 0, false, -1, -1), // base cell 105
    bc(16, 1, 0, 0, false, -1, -1), // base cell 106
    bc( 9, 2, 0, 0, true,  14, 18), // base cell 107 (pentagon)
    bc(15, 1, 0, 1, false, -1, -1), // base cell 108
    bc(15, 1, 0, 0, false, -1, -1), // base cell 109
    bc(18, 0, 1, 1, false, -1, -1), // base cell 110
    bc(18, 0, 0, 1, false, -1, -1), // base cell 111
    bc(19, 0, 0, 1, false, -1, -1), // base cell 112
    bc(17, 1, 0, 0, false, -1, -1), // base cell 113
    bc(19, 0, 0, 0, false, -1, -1), // base cell 114
    bc(18, 0, 1, 0, false, -1, -1), // base cell 115
    bc(18, 1, 0, 1, false, -1, -1), // base cell 116
    bc(19, 2, 0, 0, true,  -1, -1), // base cell 117 (pentagon)
    bc(19, 1, 0, 0, false, -1, -1), // base cell 118
    bc(18, 0, 0, 0, false, -1, -1), // base cell 119
    bc(19, 1, 0, 1, false, -1, -1), // base cell 120
    bc(18, 1, 0, 0, false, -1, -1), // base cell 121
];

/// Neighboring base cell in each digit direction. `INVALID_BASE_CELL`
/// marks the deleted K direction off a pentagon.
#[rustfmt::skip]
pub(crate) static BASE_CELL_NEIGHBORS: [[i32; 7]; NUM_BASE_CELLS as usize] = [
    [0, 1, 5, 2, 4, 3, 8],                            // base cell 0
    [1, 7, 6, 9, 0, 3, 2],                            // base cell 1
    [2, 6, 10, 11, 0, 1, 5],                          // base cell 2
    [3, 13, 1, 7, 4, 12, 0],                          // base cell 3
    [4, INVALID_BASE_CELL, 15, 8, 3, 0, 12],          // base cell 4 (pentagon)
    [5, 2, 18, 10, 8, 0, 16],                         // base cell 5
    [6, 14, 11, 17, 1, 9, 2],                         // base cell 6
    [7, 21, 9, 19, 3, 13, 1],                         // base cell 7
    [8, 5, 22, 16, 4, 0, 15],                         // base cell 8
    [9, 19, 14, 20, 1, 7, 6],                         // base cell 9
    [10, 11, 24, 23, 5, 2, 18],                       // base cell 10
    [11, 17, 23, 25, 2, 6, 10],                       // base cell 11
    [12, 28, 13, 26, 4, 15, 3],                       // base cell 12
    [13, 26, 21, 29, 3, 12, 7],                       // base cell 13
    [14, INVALID_BASE_CELL, 17, 27, 9, 20, 6],        // base cell 14 (pentagon)
    [15, 22, 28, 31, 4, 8, 12],                       // base cell 15
    [16, 18, 33, 30, 8, 5, 22],                       // base cell 16
    [17, 11, 14, 6, 35, 25, 27],                      // base cell 17
    [18, 24, 30, 32, 5, 10, 16],                      // base cell 18
    [19, 34, 20, 36, 7, 21, 9],                       // base cell 19
    [20, 14, 19, 9, 40, 27, 36],                      // base cell 20
    [21, 38, 19, 34, 13, 29, 7],                      // base cell 21
    [22, 16, 41, 33, 15, 8, 31],                      // base cell 22
    [23, 24, 11, 10, 39, 37, 25],                     // base cell 23
    [24, INVALID_BASE_CELL, 32, 37, 10, 23, 18],      // base cell 24 (pentagon)
    [25, 23, 17, 11, 45, 39, 35],                     // base cell 25
    [26, 42, 29, 43, 12, 28, 13],                     // base cell 26
    [27, 40, 35, 46, 14, 20, 17],                     // base cell 27
    [28, 31, 42, 44, 12, 15, 26],                     // base cell 28
    [29, 43, 38, 47, 13, 26, 21],                     // base cell 29
    [30, 32, 48, 50, 16, 18, 33],                     // base cell 30
    [31, 41, 44, 53, 15, 22, 28],                     // base cell 31
    [32, 30, 24, 18, 52, 50, 37],                     // base cell 32
    [33, 30, 49, 48, 22, 16, 41],                     // base cell 33
    [34, 19, 38, 21, 54, 36, 51],                     // base cell 34
    [35, 46, 45, 56, 17, 27, 25],                     // base cell 35
    [36, 20, 34, 19, 55, 40, 54],                     // base cell 36
    [37, 39, 52, 57, 24, 23, 32],                     // base cell 37
    [38, INVALID_BASE_CELL, 34, 51, 29, 47, 21],      // base cell 38 (pentagon)
    [39, 37, 25, 23, 59, 57, 45],                     // base cell 39
    [40, 27, 36, 20, 60, 46, 55],                     // base cell 40
    [41, 49, 53, 61, 22, 33, 31],                     // base cell 41
    [42, 58, 43, 62, 28, 44, 26],                     // base cell 42
    [43, 62, 47, 64, 26, 42, 29],                     // base cell 43
    [44, 53, 58, 65, 28, 31, 42],                     // base cell 44
    [45, 39, 35, 25, 63, 59, 56],                     // base cell 45
    [46, 60, 56, 68, 27, 40, 35],                     // base cell 46
    [47, 38, 43, 29, 69, 51, 64],                     // base cell 47
    [48, 49, 30, 33, 67, 66, 50],                     // base cell 48
    [49, INVALID_BASE_CELL, 61, 66, 33, 48, 41],      // base cell 49 (pentagon)
    [50, 48, 32, 30, 70, 67, 52],                     // base cell 50
    [51, 69, 54, 71, 38, 47, 34],                     // base cell 51
    [52, 57, 70, 74, 32, 37, 50],                     // base cell 52
    [53, 61, 65, 75, 31, 41, 44],                     // base cell 53
    [54, 71, 55, 73, 34, 51, 36],                     // base cell 54
    [55, 40, 54, 36, 72, 60, 73],                     // base cell 55
    [56, 68, 63, 77, 35, 46, 45],                     // base cell 56
    [57, 59, 74, 78, 37, 39, 52],                     // base cell 57
    [58, INVALID_BASE_CELL, 62, 76, 44, 65, 42],      // base cell 58 (pentagon)
    [59, 63, 78, 79, 39, 45, 57],                     // base cell 59
    [60, 72, 68, 80, 40, 55, 46],                     // base cell 60
    [61, 53, 49, 41, 81, 75, 66],                     // base cell 61
    [62, 43, 58, 42, 82, 64, 76],                     // base cell 62
    [63, INVALID_BASE_CELL, 56, 45, 79, 59, 77],      // base cell 63 (pentagon)
    [64, 47, 62, 43, 84, 69, 82],                     // base cell 64
    [65, 58, 53, 44, 86, 76, 75],                     // base cell 65
    [66, 67, 81, 85, 49, 48, 61],                     // base cell 66
    [67, 66, 50, 48, 87, 85, 70],                     // base cell 67
    [68, 56, 60, 46, 90, 77, 80],                     // base cell 68
    [69, 51, 64, 47, 89, 71, 84],                     // base cell 69
    [70, 67, 52, 50, 83, 87, 74],                     // base cell 70
    [71, 89, 73, 91, 51, 69, 54],                     // base cell 71
    [72, INVALID_BASE_CELL, 73, 55, 80, 60, 88],      // base cell 72 (pentagon)
    [73, 91, 72, 88, 54, 71, 55],                     // base cell 73
    [74, 78, 83, 92, 52, 57, 70],                     // base cell 74
    [75, 65, 61, 53, 94, 86, 81],                     // base cell 75
    [76, 86, 82, 96, 58, 65, 62],                     // base cell 76
    [77, 63, 68, 56, 93, 79, 90],                     // base cell 77
    [78, 74, 59, 57, 95, 92, 79],                     // base cell 78
    [79, 78, 63, 59, 93, 95, 77],                     // base cell 79
    [80, 68, 72, 60, 99, 90, 88],                     // base cell 80
    [81, 85, 94, 101, 61, 66, 75],                    // base cell 81
    [82, 96, 84, 98, 62, 76, 64],                     // base cell 82
    [83, INVALID_BASE_CELL, 74, 70, 100, 87, 92],     // base cell 83 (pentagon)
    [84, 69, 82, 64, 97, 89, 98],                     // base cell 84
    [85, 87, 101, 102, 66, 67, 81],                   // base cell 85
    [86, 76, 75, 65, 104, 96, 94],                    // base cell 86
    [87, 83, 102, 100, 67, 70, 85],                   // base cell 87
    [88, 72, 91, 73, 99, 80, 105],                    // base cell 88
    [89, 97, 91, 103, 69, 84, 71],                    // base cell 89
    [90, 77, 80, 68, 106, 93, 99],                    // base cell 90
    [91, 73, 89, 71, 105, 88, 103],                   // base cell 91
    [92, 83, 78, 74, 108, 100, 95],                   // base cell 92
    [93, 79, 90, 77, 109, 95, 106],                   // base cell 93
    [94, 86, 81, 75, 107, 104, 101],                  // base cell 94
    [95, 92, 79, 78, 109, 108, 93],                   // base cell 95
    [96, 104, 98, 110, 76, 86, 82],                   // base cell 96
    [97, INVALID_BASE_CELL, 98, 84, 103, 89, 111],    // base cell 97 (pentagon)
    [98, 110, 97, 111, 82, 96, 84],                   // base cell 98
    [99, 80, 105, 88, 106, 90, 113],                  // base cell 99
    [100, 102, 83, 87, 108, 114, 92],                 // base cell 100
    [101, 102, 107, 112, 81, 85, 94],                 // base cell 101
    [102, 101, 87, 85, 114, 112, 100],                // base cell 102
    [103, 91, 97, 89, 116, 105, 111],                 // base cell 103
    [104, 107, 110, 115, 86, 94, 96],                 // base cell 104
    [105, 88, 103, 91, 113, 99, 116],                 // base cell 105
    [106, 93, 99, 90, 117, 109, 113],                 // base cell 106
    [107, INVALID_BASE_CELL, 101, 94, 115, 104, 112], // base cell 107 (pentagon)
    [108, 100, 95, 92, 118, 114, 109],                // base cell 108
    [109, 108, 93, 95, 117, 118, 106],                // base cell 109
    [110, 98, 104, 96, 119, 111, 115],                // base cell 110
    [111, 97, 110, 98, 116, 103, 119],                // base cell 111
    [112, 107, 102, 101, 120, 115, 114],              // base cell 112
    [113, 99, 116, 105, 117, 106, 121],               // base cell 113
    [114, 112, 100, 102, 118, 120, 108],              // base cell 114
    [115, 110, 107, 104, 120, 119, 112],              // base cell 115
    [116, 103, 119, 111, 113, 105, 121],              // base cell 116
    [117, INVALID_BASE_CELL, 109, 118, 113, 121, 106],// base cell 117 (pentagon)
    [118, 120, 108, 114, 117, 121, 109],              // base cell 118
    [119, 111, 115, 110, 121, 116, 120],              // base cell 119
    [120, 115, 114, 112, 121, 119, 118],              // base cell 120
    [121, 116, 120, 119, 117, 113, 118],              // base cell 121
];

/// Number of 60 degree ccw rotations of the neighbor's coordinate system
/// relative to this base cell, in each digit direction.
#[rustfmt::skip]
pub(crate) static BASE_CELL_NEIGHBOR_60CCW_ROTS: [[i32; 7]; NUM_BASE_CELLS as usize] = [
    [0, 5, 0, 0, 1, 5, 1],  // base cell 0
    [0, 0, 1, 0, 1, 0, 1],  // base cell 1
    [0, 0, 0, 0, 0, 5, 0],  // base cell 2
    [0, 5, 0, 0, 2, 5, 1],  // base cell 3
    [0, -1, 1, 0, 3, 4, 2], // base cell 4 (pentagon)
    [0, 0, 1, 0, 1, 0, 1],  // base cell 5
    [0, 0, 0, 3, 5, 5, 0],  // base cell 6
    [0, 0, 0, 0, 0, 5, 0],  // base cell 7
    [0, 5, 0, 0, 0, 5, 1],  // base cell 8
    [0, 0, 1, 3, 0, 0, 1],  // base cell 9
    [0, 0, 1, 3, 0, 0, 1],  // base cell 10
    [0, 3, 3, 3, 0, 0, 0],  // base cell 11
    [0, 5, 0, 0, 3, 5, 1],  // base cell 12
    [0, 0, 1, 0, 1, 0, 1],  // base cell 13
    [0, -1, 3, 0, 5, 2, 0], // base cell 14 (pentagon)
    [0, 5, 0, 0, 4, 5, 1],  // base cell 15
    [0, 0, 0, 0, 0, 5, 0],  // base cell 16
    [0, 3, 3, 3, 3, 0, 3],  // base cell 17
    [0, 0, 0, 3, 5, 5, 0],  // base cell 18
    [0, 3, 3, 3, 0, 0, 0],  // base cell 19
    [0, 3, 3, 3, 0, 3, 0],  // base cell 20
    [0, 0, 0, 3, 5, 5, 0],  // base cell 21
    [0, 0, 1, 0, 1, 0, 1],  // base cell 22
    [0, 3, 3, 3, 0, 3, 0],  // base cell 23
    [0, -1, 3, 0, 5, 2, 0], // base cell 24 (pentagon)
    [0, 0, 0, 3, 0, 0, 3],  // base cell 25
    [0, 0, 0, 0, 0, 5, 0],  // base cell 26
    [0, 3, 0, 0, 0, 3, 3],  // base cell 27
    [0, 0, 1, 0, 1, 0, 1],  // base cell 28
    [0, 0, 1, 3, 0, 0, 1],  // base cell 29
    [0, 3, 3, 3, 0, 0, 0],  // base cell 30
    [0, 0, 0, 0, 0, 5, 0],  // base cell 31
    [0, 3, 3, 3, 3, 0, 3],  // base cell 32
    [0, 0, 1, 3, 0, 0, 1],  // base cell 33
    [0, 3, 3, 3, 3, 0, 3],  // base cell 34
    [0, 0, 3, 0, 3, 0, 3],  // base cell 35
    [0, 0, 0, 3, 0, 0, 3],  // base cell 36
    [0, 3, 0, 0, 0, 3, 3],  // base cell 37
    [0, -1, 3, 0, 5, 2, 0], // base cell 38 (pentagon)
    [0, 3, 0, 0, 3, 3, 0],  // base cell 39
    [0, 3, 0, 0, 3, 3, 0],  // base cell 40
    [0, 0, 0, 3, 5, 5, 0],  // base cell 41
    [0, 0, 0, 3, 5, 5, 0],  // base cell 42
    [0, 3, 3, 3, 0, 0, 0],  // base cell 43
    [0, 0, 1, 3, 0, 0, 1],  // base cell 44
    [0, 0, 3, 0, 0, 3, 3],  // base cell 45
    [0, 0, 0, 3, 0, 3, 0],  // base cell 46
    [0, 3, 3, 3, 0, 3, 0],  // base cell 47
    [0, 3, 3, 3, 0, 3, 0],  // base cell 48
    [0, -1, 3, 0, 5, 2, 0], // base cell 49 (pentagon)
    [0, 0, 0, 3, 0, 0, 3],  // base cell 50
    [0, 3, 0, 0, 0, 3, 3],  // base cell 51
    [0, 0, 3, 0, 3, 0, 3],  // base cell 52
    [0, 3, 3, 3, 0, 0, 0],  // base cell 53
    [0, 0, 3, 0, 3, 0, 3],  // base cell 54
    [0, 0, 3, 0, 0, 3, 3],  // base cell 55
    [0, 3, 3, 3, 0, 0, 3],  // base cell 56
    [0, 0, 0, 3, 0, 3, 0],  // base cell 57
    [0, -1, 3, 0, 5, 2, 0], // base cell 58 (pentagon)
    [0, 3, 3, 3, 3, 3, 0],  // base cell 59
    [0, 3, 3, 3, 3, 3, 0],  // base cell 60
    [0, 3, 3, 3, 3, 0, 3],  // base cell 61
    [0, 3, 3, 3, 3, 0, 3],  // base cell 62
    [0, -1, 3, 0, 5, 2, 0], // base cell 63 (pentagon)
    [0, 0, 0, 3, 0, 0, 3],  // base cell 64
    [0, 3, 3, 3, 0, 3, 0],  // base cell 65
    [0, 3, 0, 0, 0, 3, 3],  // base cell 66
    [0, 3, 0, 0, 3, 3, 0],  // base cell 67
    [0, 3, 3, 3, 0, 0, 0],  // base cell 68
    [0, 3, 0, 0, 3, 3, 0],  // base cell 69
    [0, 0, 3, 0, 0, 3, 3],  // base cell 70
    [0, 0, 0, 3, 0, 3, 0],  // base cell 71
    [0, -1, 3, 0, 5, 2, 0], // base cell 72 (pentagon)
    [0, 3, 3, 3, 0, 0, 3],  // base cell 73
    [0, 3, 3, 3, 0, 0, 3],  // base cell 74
    [0, 0, 0, 3, 0, 0, 3],  // base cell 75
    [0, 3, 0, 0, 0, 3, 3],  // base cell 76
    [0, 0, 0, 3, 0, 5, 0],  // base cell 77
    [0, 3, 3, 3, 0, 0, 0],  // base cell 78
    [0, 0, 1, 3, 1, 0, 1],  // base cell 79
    [0, 0, 1, 3, 1, 0, 1],  // base cell 80
    [0, 0, 3, 0, 3, 0, 3],  // base cell 81
    [0, 0, 3, 0, 3, 0, 3],  // base cell 82
    [0, -1, 3, 0, 5, 2, 0], // base cell 83 (pentagon)
    [0, 0, 3, 0, 0, 3, 3],  // base cell 84
    [0, 0, 0, 3, 0, 3, 0],  // base cell 85
    [0, 3, 0, 0, 3, 3, 0],  // base cell 86
    [0, 3, 3, 3, 3, 3, 0],  // base cell 87
    [0, 0, 0, 3, 0, 5, 0],  // base cell 88
    [0, 3, 3, 3, 3, 3, 0],  // base cell 89
    [0, 0, 0, 0, 0, 0, 1],  // base cell 90
    [0, 3, 3, 3, 0, 0, 0],  // base cell 91
    [0, 0, 0, 3, 0, 5, 0],  // base cell 92
    [0, 5, 0, 0, 5, 5, 0],  // base cell 93
    [0, 0, 3, 0, 0, 3, 3],  // base cell 94
    [0, 0, 0, 0, 0, 0, 1],  // base cell 95
    [0, 0, 0, 3, 0, 3, 0],  // base cell 96
    [0, -1, 3, 0, 5, 2, 0], // base cell 97 (pentagon)
    [0, 3, 3, 3, 0, 0, 3],  // base cell 98
    [0, 5, 0, 0, 5, 5, 0],  // base cell 99
    [0, 0, 1, 3, 1, 0, 1],  // base cell 100
    [0, 3, 3, 3, 0, 0, 3],  // base cell 101
    [0, 3, 3, 3, 0, 0, 0],  // base cell 102
    [0, 0, 1, 3, 1, 0, 1],  // base cell 103
    [0, 3, 3, 3, 3, 3, 0],  // base cell 104
    [0, 0, 0, 0, 0, 0, 1],  // base cell 105
    [0, 0, 1, 0, 3, 5, 1],  // base cell 106
    [0, -1, 3, 0, 5, 2, 0], // base cell 107 (pentagon)
    [0, 5, 0, 0, 5, 5, 0],  // base cell 108
    [0, 0, 1, 0, 4, 5, 1],  // base cell 109
    [0, 3, 3, 3, 0, 0, 0],  // base cell 110
    [0, 0, 0, 3, 0, 5, 0],  // base cell 111
    [0, 0, 0, 3, 0, 5, 0],  // base cell 112
    [0, 0, 1, 0, 2, 5, 1],  // base cell 113
    [0, 0, 0, 0, 0, 0, 1],  // base cell 114
    [0, 0, 1, 3, 1, 0, 1],  // base cell 115
    [0, 5, 0, 0, 5, 5, 0],  // base cell 116
    [0, -1, 1, 0, 3, 4, 2], // base cell 117 (pentagon)
    [0, 0, 1, 0, 0, 5, 1],  // base cell 118
    [0, 0, 0, 0, 0, 0, 1],  // base cell 119
    [0, 5, 0, 0, 5, 5, 0],  // base cell 120
    [0, 0, 1, 0, 1, 5, 1],  // base cell 121
];

/// One entry of the res 0 reverse lookup: which base cell sits at a face
/// coordinate, and how many 60 degree ccw rotations into its orientation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BaseCellRotation {
  pub cell: i32,
  pub ccw_rot60: i32,
}

const fn r(cell: i32, ccw_rot60: i32) -> BaseCellRotation {
  BaseCellRotation { cell, ccw_rot60 }
}

/// Res 0 base cell lookup for each face. Indexed by face, then i, j, k
/// (all 0..=2) in that face's coordinate system.
#[rustfmt::skip]
pub(crate) static FACE_IJK_BASE_CELLS: [[[[BaseCellRotation; 3]; 3]; 3]; NUM_FACES as usize] = [
    // face 0
    [[[r(16, 0), r(18, 0), r(24, 0)], [r(33, 0), r(30, 0), r(32, 3)], [r(49, 1), r(48, 3), r(50, 3)]],
     [[r(8,  0), r(5,  5), r(10, 5)], [r(22, 0), r(16, 0), r(18, 0)], [r(41, 1), r(33, 0), r(30, 0)]],
     [[r(4,  0), r(0,  5), r(2,  5)], [r(15, 1), r(8,  0), r(5,  5)], [r(31, 1), r(22, 0), r(16, 0)]]],
    // face 1
    [[[r(2,  0), r(6,  0), r(14, 0)], [r(10, 0), r(11, 0), r(17, 3)], [r(24, 1), r(23, 3), r(25, 3)]],
     [[r(0,  0), r(1,  5), r(9,  5)], [r(5,  0), r(2,  0), r(6,  0)], [r(18, 1), r(10, 0), r(11, 0)]],
     [[r(4,  1), r(3,  5), r(7,  5)], [r(8,  1), r(0,  0), r(1,  5)], [r(16, 1), r(5,  0), r(2,  0)]]],
    // face 2
    [[[r(7,  0), r(21, 0), r(38, 0)], [r(9,  0), r(19, 0), r(34, 3)], [r(14, 1), r(20, 3), r(36, 3)]],
     [[r(3,  0), r(13, 5), r(29, 5)], [r(1,  0), r(7,  0), r(21, 0)], [r(6,  1), r(9,  0), r(19, 0)]],
     [[r(4,  2), r(12, 5), r(26, 5)], [r(0,  1), r(3,  0), r(13, 5)], [r(2,  1), r(1,  0), r(7,  0)]]],
    // face 3
    [[[r(26, 0), r(42, 0), r(58, 0)], [r(29, 0), r(43, 0), r(62, 3)], [r(38, 1), r(47, 3), r(64, 3)]],
     [[r(12, 0), r(28, 5), r(44, 5)], [r(13, 0), r(26, 0), r(42, 0)], [r(21, 1), r(29, 0), r(43, 0)]],
     [[r(4,  3), r(15, 5), r(31, 5)], [r(3,  1), r(12, 0), r(28, 5)], [r(7,  1), r(13, 0), r(26, 0)]]],
    // face 4
    [[[r(31, 0), r(41, 0), r(49, 0)], [r(44, 0), r(53, 0), r(61, 3)], [r(58, 1), r(65, 3), r(75, 3)]],
     [[r(15, 0), r(22, 5), r(33, 5)], [r(28, 0), r(31, 0), r(41, 0)], [r(42, 1), r(44, 0), r(53, 0)]],
     [[r(4,  4), r(8,  5), r(16, 5)], [r(12, 1), r(15, 0), r(22, 5)], [r(26, 1), r(28, 0), r(31, 0)]]],
    // face 5
    [[[r(50, 0), r(48, 0), r(49, 3)], [r(32, 0), r(30, 3), r(33, 3)], [r(24, 3), r(18, 3), r(16, 3)]],
     [[r(70, 0), r(67, 0), r(66, 3)], [r(52, 3), r(50, 0), r(48, 0)], [r(37, 3), r(32, 0), r(30, 3)]],
     [[r(83, 0), r(87, 3), r(85, 3)], [r(74, 3), r(70, 0), r(67, 0)], [r(57, 1), r(52, 3), r(50, 0)]]],
    // face 6
    [[[r(25, 0), r(23, 0), r(24, 3)], [r(17, 0), r(11, 3), r(10, 3)], [r(14, 3), r(6,  3), r(2,  3)]],
     [[r(45, 0), r(39, 0), r(37, 3)], [r(35, 3), r(25, 0), r(23, 0)], [r(27, 3), r(17, 0), r(11, 3)]],
     [[r(63, 0), r(59, 3), r(57, 3)], [r(56, 3), r(45, 0), r(39, 0)], [r(46, 3), r(35, 3), r(25, 0)]]],
    // face 7
    [[[r(36, 0), r(20, 0), r(14, 3)], [r(34, 0), r(19, 3), r(9,  3)], [r(38, 3), r(21, 3), r(7,  3)]],
     [[r(55, 0), r(40, 0), r(27, 3)], [r(54, 3), r(36, 0), r(20, 0)], [r(51, 3), r(34, 0), r(19, 3)]],
     [[r(72, 0), r(60, 3), r(46, 3)], [r(73, 3), r(55, 0), r(40, 0)], [r(71, 3), r(54, 3), r(36, 0)]]],
    // face 8
    [[[r(64, 0), r(47, 0), r(38, 3)], [r(62, 0), r(43, 3), r(29, 3)], [r(58, 3), r(42, 3), r(26, 3)]],
     [[r(84, 0), r(69, 0), r(51, 3)], [r(82, 3), r(64, 0), r(47, 0)], [r(76, 3), r(62, 0), r(43, 3)]],
     [[r(97, 0), r(89, 3), r(71, 3)], [r(98, 3), r(84, 0), r(69, 0)], [r(96, 3), r(82, 3), r(64, 0)]]],
    // face 9
    [[[r(75, 0), r(65, 0), r(58, 3)], [r(61, 0), r(53, 3), r(44, 3)], [r(49, 3), r(41, 3), r(31, 3)]],
     [[r(94, 0), r(86, 0), r(76, 3)], [r(81, 3), r(75, 0), r(65, 0)], [r(66, 3), r(61, 0), r(53, 3)]],
     [[r(107,0), r(104,3), r(96, 3)], [r(101,3), r(94, 0), r(86, 0)], [r(85, 3), r(81, 3), r(75, 0)]]],
    // face 10
    [[[r(57, 0), r(59, 0), r(63, 3)], [r(74, 0), r(78, 3), r(79, 3)], [r(83, 3), r(92, 3), r(95, 3)]],
     [[r(37, 0), r(39, 3), r(45, 3)], [r(52, 0), r(57, 0), r(59, 0)], [r(70, 3), r(74, 0), r(78, 3)]],
     [[r(24, 0), r(23, 3), r(25, 3)], [r(32, 3), r(37, 0), r(39, 3)], [r(50, 3), r(52, 0), r(57, 0)]]],
    // face 11
    [[[r(46, 0), r(60, 0), r(72, 3)], [r(56, 0), r(68, 3), r(80, 3)], [r(63, 3), r(77, 3), r(90, 3)]],
     [[r(27, 0), r(40, 3), r(55, 3)], [r(35, 0), r(46, 0), r(60, 0)], [r(45, 3), r(56, 0), r(68, 3)]],
     [[r(14, 0), r(20, 3), r(36, 3)], [r(17, 3), r(27, 0), r(40, 3)], [r(25, 3), r(35, 0), r(46, 0)]]],
    // face 12
    [[[r(71, 0), r(89, 0), r(97, 3)], [r(73, 0), r(91, 3), r(103,3)], [r(72, 3), r(88, 3), r(105,3)]],
     [[r(51, 0), r(69, 3), r(84, 3)], [r(54, 0), r(71, 0), r(89, 0)], [r(55, 3), r(73, 0), r(91, 3)]],
     [[r(38, 0), r(47, 3), r(64, 3)], [r(34, 3), r(51, 0), r(69, 3)], [r(36, 3), r(54, 0), r(71, 0)]]],
    // face 13
    [[[r(96, 0), r(104,0), r(107,3)], [r(98, 0), r(110,3), r(115,3)], [r(97, 3), r(111,3), r(119,3)]],
     [[r(76, 0), r(86, 3), r(94, 3)], [r(82, 0), r(96, 0), r(104,0)], [r(84, 3), r(98, 0), r(110,3)]],
     [[r(58, 0), r(65, 3), r(75, 3)], [r(62, 3), r(76, 0), r(86, 3)], [r(64, 3), r(82, 0), r(96, 0)]]],
    // face 14
    [[[r(85, 0), r(87, 0), r(83, 3)], [r(101,0), r(102,3), r(100,3)], [r(107,3), r(112,3), r(114,3)]],
     [[r(66, 0), r(67, 3), r(70, 3)], [r(81, 0), r(85, 0), r(87, 0)], [r(94, 3), r(101,0), r(102,3)]],
     [[r(49, 0), r(48, 3), r(50, 3)], [r(61, 3), r(66, 0), r(67, 3)], [r(75, 3), r(81, 0), r(85, 0)]]],
    // face 15
    [[[r(95, 0), r(92, 0), r(83, 0)], [r(79, 0), r(78, 0), r(74, 3)], [r(63, 1), r(59, 3), r(57, 3)]],
     [[r(109,0), r(108,0), r(100,5)], [r(93, 1), r(95, 0), r(92, 0)], [r(77, 1), r(79, 0), r(78, 0)]],
     [[r(117,4), r(118,5), r(114,5)], [r(106,1), r(109,0), r(108,0)], [r(90, 1), r(93, 1), r(95, 0)]]],
    // face 16
    [[[r(90, 0), r(77, 0), r(63, 0)], [r(80, 0), r(68, 0), r(56, 3)], [r(72, 1), r(60, 3), r(46, 3)]],
     [[r(106,0), r(93, 0), r(79, 5)], [r(99, 1), r(90, 0), r(77, 0)], [r(88, 1), r(80, 0), r(68, 0)]],
     [[r(117,3), r(109,5), r(95, 5)], [r(113,1), r(106,0), r(93, 0)], [r(105,1), r(99, 1), r(90, 0)]]],
    // face 17
    [[[r(105,0), r(88, 0), r(72, 0)], [r(103,0), r(91, 0), r(73, 3)], [r(97, 1), r(89, 3), r(71, 3)]],
     [[r(113,0), r(99, 0), r(80, 5)], [r(116,1), r(105,0), r(88, 0)], [r(111,1), r(103,0), r(91, 0)]],
     [[r(117,2), r(106,5), r(90, 5)], [r(121,1), r(113,0), r(99, 0)], [r(119,1), r(116,1), r(105,0)]]],
    // face 18
    [[[r(119,0), r(111,0), r(97, 0)], [r(115,0), r(110,0), r(98, 3)], [r(107,1), r(104,3), r(96, 3)]],
     [[r(121,0), r(116,0), r(103,5)], [r(120,1), r(119,0), r(111,0)], [r(112,1), r(115,0), r(110,0)]],
     [[r(117,1), r(113,5), r(105,5)], [r(118,1), r(121,0), r(116,0)], [r(114,1), r(120,1), r(119,0)]]],
    // face 19
    [[[r(114,0), r(112,0), r(107,0)], [r(100,0), r(102,0), r(101,3)], [r(83, 1), r(87, 3), r(85, 3)]],
     [[r(118,0), r(120,0), r(115,5)], [r(108,1), r(114,0), r(112,0)], [r(92, 1), r(100,0), r(102,0)]],
     [[r(117,0), r(121,5), r(119,5)], [r(109,1), r(118,0), r(120,0)], [r(95, 1), r(108,1), r(114,0)]]],
];

/// Whether the base cell is one of the 12 pentagons.
#[inline]
#[must_use]
pub(crate) fn is_base_cell_pentagon(base_cell: i32) -> bool {
  if !(0..NUM_BASE_CELLS).contains(&base_cell) {
    return false;
  }
  BASE_CELL_DATA[base_cell as usize].is_pentagon
}

/// Whether the base cell is one of the two polar pentagons.
#[inline]
#[must_use]
pub(crate) fn is_base_cell_polar_pentagon(base_cell: i32) -> bool {
  base_cell == 4 || base_cell == 117
}

/// Home face address of a base cell.
#[inline]
#[must_use]
pub(crate) fn base_cell_home(base_cell: i32) -> FaceCoord {
  debug_assert!((0..NUM_BASE_CELLS).contains(&base_cell));
  BASE_CELL_DATA[base_cell as usize].home
}

/// The base cell at a res 0 face coordinate, or `INVALID_BASE_CELL` when
/// the coordinate is outside the lookup range.
#[must_use]
pub(crate) fn face_coord_to_base_cell(fc: &FaceCoord) -> i32 {
  let c = fc.coord;
  if !(0..NUM_FACES).contains(&fc.face)
    || !(0..=MAX_FACE_COORD).contains(&c.i)
    || !(0..=MAX_FACE_COORD).contains(&c.j)
    || !(0..=MAX_FACE_COORD).contains(&c.k)
  {
    return INVALID_BASE_CELL;
  }
  FACE_IJK_BASE_CELLS[fc.face as usize][c.i as usize][c.j as usize][c.k as usize].cell
}

/// The rotation count into the base cell's orientation at a res 0 face
/// coordinate, or `INVALID_ROTATIONS` when out of range.
#[must_use]
pub(crate) fn face_coord_to_ccw_rot60(fc: &FaceCoord) -> i32 {
  let c = fc.coord;
  if !(0..NUM_FACES).contains(&fc.face)
    || !(0..=MAX_FACE_COORD).contains(&c.i)
    || !(0..=MAX_FACE_COORD).contains(&c.j)
    || !(0..=MAX_FACE_COORD).contains(&c.k)
  {
    return INVALID_ROTATIONS;
  }
  FACE_IJK_BASE_CELLS[fc.face as usize][c.i as usize][c.j as usize][c.k as usize].ccw_rot60
}

/// Whether `face` is one of the base cell's clockwise offset faces.
#[inline]
#[must_use]
pub(crate) fn base_cell_is_cw_offset(base_cell: i32, face: i32) -> bool {
  if !(0..NUM_BASE_CELLS).contains(&base_cell) {
    return false;
  }
  let data = &BASE_CELL_DATA[base_cell as usize];
  data.is_pentagon && (data.cw_offset_faces[0] == face || data.cw_offset_faces[1] == face)
}

/// The neighboring base cell in the given digit direction.
#[inline]
#[must_use]
pub(crate) fn base_cell_neighbor(base_cell: i32, dir: Digit) -> i32 {
  debug_assert!((0..NUM_BASE_CELLS).contains(&base_cell));
  BASE_CELL_NEIGHBORS[base_cell as usize][dir as usize]
}

/// The digit direction from one base cell to a neighboring base cell, or
/// `Digit::Invalid` when they are not neighbors.
#[must_use]
pub(crate) fn base_cell_direction(origin: i32, neighbor: i32) -> Digit {
  for d in 0u8..7 {
    let dir = Digit::from_u8(d);
    if base_cell_neighbor(origin, dir) == neighbor {
      return dir;
    }
  }
  Digit::Invalid
}

/// The res 0 cell index for a base cell number.
#[must_use]
pub(crate) fn base_cell_to_cell(base_cell: i32) -> CellIndex {
  if !(0..NUM_BASE_CELLS).contains(&base_cell) {
    return CellIndex::NULL;
  }
  CellIndex::with_digits(0, base_cell, Digit::Center)
}
