use problab_config::{LineTable, SymbolTable};
use problab_core::{Credits, Row, SymbolId};

/// Flattened pay table: one non-decreasing payout row per symbol, stored
/// contiguously with per-symbol start offsets (row width is uniform across
/// symbols, enforced by [`SymbolTable::validate`]).
#[derive(Debug, Clone)]
pub struct FlatPayTable {
    flat: Vec<Credits>,
    offsets: Vec<usize>,
    width: usize,
    min_pay_count: Vec<u32>,
}

impl FlatPayTable {
    pub fn build(symbols: &SymbolTable) -> Self {
        let width = symbols
            .symbols
            .first()
            .map(|s| s.pay_table.len())
            .unwrap_or(0);
        let mut flat = Vec::with_capacity(symbols.symbols.len() * width);
        let mut offsets = Vec::with_capacity(symbols.symbols.len());
        let mut min_pay_count = Vec::with_capacity(symbols.symbols.len());
        for s in &symbols.symbols {
            offsets.push(flat.len());
            flat.extend_from_slice(&s.pay_table);
            min_pay_count.push(
                s.pay_table
                    .iter()
                    .position(|&p| p != 0)
                    .map(|i| i as u32 + 1)
                    .unwrap_or(0),
            );
        }
        Self {
            flat,
            offsets,
            width,
            min_pay_count,
        }
    }

    /// Payout for `symbol` at 1-indexed run length `count`. Zero if `count`
    /// exceeds the table's width or the symbol doesn't pay at that length.
    #[inline]
    pub fn pay(&self, symbol: SymbolId, count: u32) -> Credits {
        if count == 0 || count as usize > self.width {
            return 0;
        }
        let base = self.offsets[symbol as usize];
        self.flat[base + count as usize - 1]
    }

    /// Like [`Self::pay`] but clamps `count` to the table's width instead of
    /// zeroing past it: counts beyond the highest authored band still pay
    /// that band's rate. Used by the cluster calculator, where a cluster can
    /// exceed the pay table's largest row.
    #[inline]
    pub fn pay_clamped(&self, symbol: SymbolId, count: u32) -> Credits {
        let clamped = (count as usize).clamp(1, self.width.max(1));
        self.pay(symbol, clamped as u32)
    }

    /// Smallest run length that pays a non-zero amount, or `0` if the
    /// symbol never pays.
    #[inline]
    pub fn min_pay_count(&self, symbol: SymbolId) -> u32 {
        self.min_pay_count[symbol as usize]
    }

    pub fn width(&self) -> usize {
        self.width
    }
}

/// A line table flattened row-major, plus a precomputed reversed copy (the
/// same lines with column order mirrored) for RTL evaluation without
/// re-deriving it on every spin.
#[derive(Debug, Clone)]
pub struct FlatLineTable {
    flat: Vec<Row>,
    reversed: Vec<Row>,
    offsets: Vec<usize>,
    columns: usize,
}

impl FlatLineTable {
    pub fn build(table: &LineTable, columns: usize) -> Self {
        let mut flat = Vec::with_capacity(table.lines.len() * columns);
        let mut reversed = Vec::with_capacity(table.lines.len() * columns);
        let mut offsets = Vec::with_capacity(table.lines.len());
        for line in &table.lines {
            offsets.push(flat.len());
            flat.extend_from_slice(line);
            reversed.extend(line.iter().rev());
        }
        Self {
            flat,
            reversed,
            offsets,
            columns,
        }
    }

    pub fn line_count(&self) -> usize {
        self.offsets.len()
    }

    /// Row sequence for `line_id`, left to right.
    #[inline]
    pub fn line(&self, line_id: usize) -> &[Row] {
        let start = self.offsets[line_id];
        &self.flat[start..start + self.columns]
    }

    /// Row sequence for `line_id`, right to left.
    #[inline]
    pub fn line_reversed(&self, line_id: usize) -> &[Row] {
        let start = self.offsets[line_id];
        &self.reversed[start..start + self.columns]
    }
}
