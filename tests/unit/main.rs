//! Unit tests mirroring the `src/` layout, one file per source file

mod quantize;
mod spatial;
