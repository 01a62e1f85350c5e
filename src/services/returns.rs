//! Daily return derivation.
//!
//! Returns are chained per ticker over its chronologically ordered closes
//! and recomputed from scratch after every merge, so the value at a fetch
//! window boundary is always computed against the true prior close.

use crate::models::Bar;

/// Percentage returns over a chronologically ordered close series.
///
/// `returns[0]` is None. For i > 0 the value is
/// `(closes[i] - closes[i-1]) / closes[i-1] * 100`, or None when the prior
/// close is zero.
pub fn derive_returns(closes: &[f64]) -> Vec<Option<f64>> {
    let mut returns = Vec::with_capacity(closes.len());

    for (i, &close) in closes.iter().enumerate() {
        if i == 0 {
            returns.push(None);
            continue;
        }

        let prev = closes[i - 1];
        if prev == 0.0 {
            returns.push(None);
        } else {
            returns.push(Some((close - prev) / prev * 100.0));
        }
    }

    returns
}

/// Rewrite `daily_return_pct` across a (ticker, date)-sorted slice.
///
/// Each ticker's run of rows is treated as its own series; a return is
/// never computed between the last row of one ticker and the first row of
/// the next.
pub fn apply_returns(bars: &mut [Bar]) {
    let mut start = 0;
    while start < bars.len() {
        let mut end = start + 1;
        while end < bars.len() && bars[end].ticker == bars[start].ticker {
            end += 1;
        }

        let closes: Vec<f64> = bars[start..end].iter().map(|b| b.close).collect();
        let returns = derive_returns(&closes);

        for (bar, ret) in bars[start..end].iter_mut().zip(returns) {
            bar.daily_return_pct = ret;
        }

        start = end;
    }
}
