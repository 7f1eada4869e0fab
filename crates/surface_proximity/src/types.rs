//! Identifier types shared by the oracle, collectors and CSR structure.

use smallvec::SmallVec;

/// Element (tetrahedron) identifier in `[0, num_elements)`.
pub type ElementId = u32;

/// Face identifier in `[0, num_faces)`.
pub type FaceId = u32;

/// Up to four faces of one element, stored inline.
pub type FaceList = SmallVec<[FaceId; 4]>;

/// Up to four elements (neighbors of one element), stored inline.
pub type ElementList = SmallVec<[ElementId; 4]>;
