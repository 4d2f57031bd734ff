/// Aggregation layer: pure functions over filtered records.
///
/// Every function here is total – an empty input produces the defined
/// empty representation (`0.0`, `None`, empty vec, all-zero matrix), never
/// an error. The UI layer consumes these outputs and must not re-derive
/// aggregation semantics of its own.

pub mod aggregate;
