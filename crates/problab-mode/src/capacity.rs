use problab_config::BetTypeFamily;

/// Conservative initial `(details, hits)` capacity for a mode's
/// `GameModeResult` pool. Growth past these estimates is permitted but
/// should be a cold path.
pub fn estimate_capacity(
    bet_type: BetTypeFamily,
    symbol_count: usize,
    line_count: usize,
    columns: usize,
    rows: usize,
) -> (usize, usize) {
    let cells = columns * rows;
    match bet_type {
        BetTypeFamily::LineLtr | BetTypeFamily::LineRtl | BetTypeFamily::LineBoth => {
            (line_count + 1, columns * line_count)
        }
        BetTypeFamily::WayLtr | BetTypeFamily::WayRtl | BetTypeFamily::WayBoth => {
            (2 * (symbol_count + rows), 2 * cells)
        }
        BetTypeFamily::Count => (symbol_count + 1, 2 * cells),
        BetTypeFamily::Cluster => (cells + symbol_count, 2 * cells),
    }
}
