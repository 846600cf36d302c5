//! Integration tests for the rename and manifest stages

mod end_to_end;
mod manifest_merge;
mod source_maps;
