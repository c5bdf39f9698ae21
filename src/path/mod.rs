mod resolve;
mod segments;

pub use resolve::{combine_paths, resolve, strip_splat};
pub use segments::{
    SegmentKind, SegmentList, decode_component, dynamic_param, segment_kind, segmentize,
    splat_param, strip_slashes,
};

pub(crate) use resolve::split_query;
