//! Prelude module - common imports for sheetsift users
//!
//! ```rust
//! use sheetsift::prelude::*;
//! ```

pub use crate::{
    // Pipeline
    sample_schema,
    TypedRow,
    TypedRows,

    // Rows and cells
    CellAddress,
    CellRecord,
    Row,

    // Cursor
    CursorOptions,
    SharedStringTable,
    SharedStrings,
    SheetCursor,

    // Inference and decoding
    ConvertOptions,
    DataType,
    DateFormat,
    DecimalFormat,
    DecodedCell,
    RowDecoder,
    Schema,
    SchemaInferrer,
    TypedValue,
};
