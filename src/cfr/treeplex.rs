//! Sequence-form decision space of one player.
//!
//! A treeplex indexes a player's infosets in ascending key order, which is a
//! parent-before-child order (see [`crate::cfr::infoset`]). Every numeric
//! buffer over the treeplex is a flat `num_infosets * 9` array: row `i`
//! holds the nine action slots of infoset `i`, and slots of illegal actions
//! are always zero.
//!
//! Two encodings share that shape:
//! - **behavioral**: each row is a probability distribution over the legal
//!   actions of the infoset;
//! - **sequence-form**: each slot is the unconditional probability that the
//!   player plays the sequence ending in that (infoset, action) pair.

use std::ops::Range;

use rustc_hash::FxHashMap;

use crate::cfr::error::{check_len, SolverError, SolverResult};
use crate::cfr::infoset::{
    is_legal, legal_actions, ActionMask, InfosetKey, InfosetMetadata, FULL_MASK, MAX_ACTIONS,
};

/// Stabilizer added to every legal slot when converting sequence-form back
/// to behavioral form.
pub const SF_TO_BH_EPS: f64 = 1e-6;

/// Below this positive-regret mass a row falls back to uniform.
pub const REGRET_FLOOR: f64 = 1e-10;

/// Allowed deviation of a behavioral row sum from 1.
pub const SUM_TOLERANCE: f64 = 1e-6;

/// `parent_index` entry of the root infoset.
pub const NO_PARENT: u32 = u32::MAX;

#[inline]
fn row_range(i: usize) -> Range<usize> {
    i * MAX_ACTIONS..(i + 1) * MAX_ACTIONS
}

/// Dot product of two equally long slices.
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Projects one row of regrets onto the simplex over `mask`.
///
/// Negative regrets are clipped to zero and the row is normalized. If the
/// clipped mass is below [`REGRET_FLOOR`] the row becomes uniform over the
/// legal actions. Illegal slots are always set to zero.
///
/// # Errors
/// [`SolverError::Shape`] if `row` is not nine slots long,
/// [`SolverError::Invariant`] if `mask` has no legal action.
pub fn relu_normalize(row: &mut [f64], mask: ActionMask) -> SolverResult<()> {
    check_len(MAX_ACTIONS, row.len())?;
    if mask & FULL_MASK == 0 {
        return Err(SolverError::Invariant(
            "cannot normalize a row without legal actions".to_string(),
        ));
    }

    let mut sum = 0.0;
    for (j, v) in row.iter_mut().enumerate() {
        *v = if is_legal(mask, j) { v.max(0.0) } else { 0.0 };
        sum += *v;
    }

    if sum < REGRET_FLOOR {
        sum = 0.0;
        for (j, v) in row.iter_mut().enumerate() {
            *v = if is_legal(mask, j) { 1.0 } else { 0.0 };
            sum += *v;
        }
    }

    for v in row.iter_mut() {
        *v /= sum;
    }
    Ok(())
}

fn fill_uniform(row: &mut [f64], mask: ActionMask) {
    let na = mask.count_ones() as f64;
    for (j, v) in row.iter_mut().enumerate() {
        *v = if is_legal(mask, j) { 1.0 / na } else { 0.0 };
    }
}

/// Indexed infosets of one player for one game.
///
/// Built once; the topology never changes afterwards.
#[derive(Debug, Clone)]
pub struct Treeplex {
    /// Key -> (legal actions, row) lookup.
    infosets: FxHashMap<InfosetKey, InfosetMetadata>,
    /// Keys by row, strictly ascending, `infoset_keys[0] == ROOT`.
    infoset_keys: Vec<InfosetKey>,
    /// Legal actions by row.
    legal_actions: Vec<ActionMask>,
    /// Row of the parent infoset, [`NO_PARENT`] for the root.
    parent_index: Vec<u32>,
}

impl Treeplex {
    /// Build a treeplex from the legal-action masks of every infoset.
    ///
    /// Keys are sorted ascending and assigned consecutive rows; each row's
    /// parent is found through the key's parent key.
    ///
    /// # Errors
    /// [`SolverError::Invariant`] if the root key is missing, a mask is empty
    /// or has bits above action 8, a parent key is missing, or the parent
    /// does not allow the action leading to its child.
    pub fn from_masks(masks: FxHashMap<InfosetKey, ActionMask>) -> SolverResult<Self> {
        let mut infoset_keys: Vec<InfosetKey> = masks.keys().copied().collect();
        infoset_keys.sort_unstable();

        if infoset_keys.first() != Some(&InfosetKey::ROOT) {
            return Err(SolverError::Invariant("root infoset not found".to_string()));
        }
        if infoset_keys.len() >= NO_PARENT as usize {
            return Err(SolverError::Invariant(format!(
                "too many infosets ({})",
                infoset_keys.len()
            )));
        }

        let n = infoset_keys.len();
        let mut infosets = FxHashMap::with_capacity_and_hasher(n, Default::default());
        let mut legal = Vec::with_capacity(n);

        for (i, key) in infoset_keys.iter().enumerate() {
            let mask = masks[key];
            if mask == 0 || mask & !FULL_MASK != 0 {
                return Err(SolverError::Invariant(format!(
                    "infoset {} has invalid legal-action mask {:#b}",
                    key, mask
                )));
            }
            infosets.insert(
                *key,
                InfosetMetadata {
                    legal_actions: mask,
                    infoset_id: i as u32,
                },
            );
            legal.push(mask);
        }

        let mut parent_index = vec![NO_PARENT; n];
        for (i, key) in infoset_keys.iter().enumerate().skip(1) {
            let (Some(parent), Some(action)) = (key.parent(), key.parent_action()) else {
                return Err(SolverError::Invariant(format!("duplicate root key at row {}", i)));
            };
            let md = infosets.get(&parent).ok_or_else(|| {
                SolverError::Invariant(format!(
                    "parent infoset {} of {} not found",
                    parent.raw(),
                    key.raw()
                ))
            })?;
            if !is_legal(md.legal_actions, action) {
                return Err(SolverError::Invariant(format!(
                    "parent action {} of infoset {} is illegal",
                    action, key
                )));
            }
            parent_index[i] = md.infoset_id;
        }

        Ok(Self {
            infosets,
            infoset_keys,
            legal_actions: legal,
            parent_index,
        })
    }

    /// Number of infosets (rows).
    pub fn num_infosets(&self) -> usize {
        self.infoset_keys.len()
    }

    /// Length of every buffer over this treeplex.
    pub fn buffer_len(&self) -> usize {
        self.num_infosets() * MAX_ACTIONS
    }

    /// Keys by row.
    pub fn infoset_keys(&self) -> &[InfosetKey] {
        &self.infoset_keys
    }

    /// Legal-action masks by row.
    pub fn legal_actions(&self) -> &[ActionMask] {
        &self.legal_actions
    }

    /// Parent rows ([`NO_PARENT`] for row 0).
    pub fn parent_index(&self) -> &[u32] {
        &self.parent_index
    }

    /// Row of `key`, if the infoset exists.
    pub fn infoset_id(&self, key: InfosetKey) -> Option<usize> {
        self.infosets.get(&key).map(|md| md.infoset_id as usize)
    }

    /// Metadata of `key`, if the infoset exists.
    pub fn metadata(&self, key: InfosetKey) -> Option<&InfosetMetadata> {
        self.infosets.get(&key)
    }

    /// Parent row and the parent action leading to row `i`; `None` for the root.
    #[inline]
    pub fn parent(&self, i: usize) -> Option<(usize, usize)> {
        self.infoset_keys[i]
            .parent_action()
            .map(|action| (self.parent_index[i] as usize, action))
    }

    /// Human-readable description of the infoset at `row`.
    pub fn infoset_desc(&self, row: usize) -> SolverResult<String> {
        match self.infoset_keys.get(row) {
            Some(key) => Ok(key.to_string()),
            None => Err(SolverError::Usage(format!(
                "invalid row (expected < {}; found {})",
                self.num_infosets(),
                row
            ))),
        }
    }

    /// Check shape and that every illegal slot is zero.
    pub fn validate_vector(&self, buf: &[f64]) -> SolverResult<()> {
        check_len(self.buffer_len(), buf.len())?;

        for (i, (row, &mask)) in buf
            .chunks_exact(MAX_ACTIONS)
            .zip(&self.legal_actions)
            .enumerate()
        {
            for (j, &v) in row.iter().enumerate() {
                if !is_legal(mask, j) && v != 0.0 {
                    return Err(SolverError::Invariant(format!(
                        "vector must be zero for illegal actions (row {}, action {}, found {})",
                        i, j, v
                    )));
                }
            }
        }
        Ok(())
    }

    /// Check that `buf` is a well-formed behavioral strategy.
    pub fn validate_strategy(&self, buf: &[f64]) -> SolverResult<()> {
        check_len(self.buffer_len(), buf.len())?;

        for (i, (row, &mask)) in buf
            .chunks_exact(MAX_ACTIONS)
            .zip(&self.legal_actions)
            .enumerate()
        {
            let mut sum = 0.0;
            for (j, &v) in row.iter().enumerate() {
                if !(v >= 0.0) {
                    return Err(SolverError::Invariant(format!(
                        "strategy must be nonnegative, was {} (row {})",
                        v, i
                    )));
                }
                if !(v <= 1.0) {
                    return Err(SolverError::Invariant(format!(
                        "strategy must be at most 1, was {} (row {})",
                        v, i
                    )));
                }
                if is_legal(mask, j) {
                    sum += v;
                } else if v != 0.0 {
                    return Err(SolverError::Invariant(format!(
                        "strategy must be zero for illegal actions (row {}, action {})",
                        i, j
                    )));
                }
            }
            if (sum - 1.0).abs() > SUM_TOLERANCE {
                return Err(SolverError::Invariant(format!(
                    "strategy must sum to 1 but found {} (row {})",
                    sum, i
                )));
            }
        }
        Ok(())
    }

    /// Write the uniform behavioral strategy into `buf`.
    pub fn set_uniform(&self, buf: &mut [f64]) -> SolverResult<()> {
        check_len(self.buffer_len(), buf.len())?;

        for (row, &mask) in buf.chunks_exact_mut(MAX_ACTIONS).zip(&self.legal_actions) {
            fill_uniform(row, mask);
        }
        Ok(())
    }

    /// Fresh uniform behavioral strategy.
    pub fn uniform_strategy(&self) -> Vec<f64> {
        let mut buf = vec![0.0; self.buffer_len()];
        for (row, &mask) in buf.chunks_exact_mut(MAX_ACTIONS).zip(&self.legal_actions) {
            fill_uniform(row, mask);
        }
        buf
    }

    /// Behavioral to sequence-form, in place.
    ///
    /// One ascending pass: each row is scaled by the already-converted
    /// parent slot. Row 0 is left unchanged.
    pub fn bh_to_sf(&self, buf: &mut [f64]) -> SolverResult<()> {
        check_len(self.buffer_len(), buf.len())?;

        for i in 1..self.num_infosets() {
            if let Some((parent, action)) = self.parent(i) {
                let reach = buf[parent * MAX_ACTIONS + action];
                for v in &mut buf[row_range(i)] {
                    *v *= reach;
                }
            }
        }
        Ok(())
    }

    /// Sequence-form to behavioral, in place.
    ///
    /// Each row is renormalized as `(v + eps) / sum(v + eps)` over its legal
    /// slots, so rows that are never reached come out uniform.
    pub fn sf_to_bh(&self, buf: &mut [f64]) -> SolverResult<()> {
        self.validate_vector(buf)?;

        for (row, &mask) in buf.chunks_exact_mut(MAX_ACTIONS).zip(&self.legal_actions) {
            let sum: f64 = legal_actions(mask).map(|j| row[j] + SF_TO_BH_EPS).sum();
            for (j, v) in row.iter_mut().enumerate() {
                *v = if is_legal(mask, j) {
                    (*v + SF_TO_BH_EPS) / sum
                } else {
                    0.0
                };
            }
        }
        Ok(())
    }

    /// Regrets to behavioral strategy, in place, one [`relu_normalize`] per row.
    pub fn regret_to_bh(&self, buf: &mut [f64]) -> SolverResult<()> {
        self.validate_vector(buf)?;

        for (row, &mask) in buf.chunks_exact_mut(MAX_ACTIONS).zip(&self.legal_actions) {
            relu_normalize(row, mask)?;
        }
        Ok(())
    }

    /// Best response by backward induction over `gradient`.
    ///
    /// Rows are visited in descending order, so every child is finished
    /// before its parent. At each row the legal action with the largest
    /// value is chosen and that value is added into the parent's slot; the
    /// gradient buffer is modified accordingly. If `strategy` is given it
    /// receives the deterministic best-response strategy. Returns the value
    /// chosen at the root.
    pub fn br(&self, gradient: &mut [f64], mut strategy: Option<&mut [f64]>) -> SolverResult<f64> {
        self.validate_vector(gradient)?;
        if let Some(strat) = strategy.as_deref_mut() {
            check_len(self.buffer_len(), strat.len())?;
            strat.fill(0.0);
        }

        let mut value = f64::NEG_INFINITY;
        for i in (0..self.num_infosets()).rev() {
            let mask = self.legal_actions[i];
            let row = &gradient[row_range(i)];

            let mut best: Option<usize> = None;
            for j in legal_actions(mask) {
                if best.map_or(true, |b| row[j] > row[b]) {
                    best = Some(j);
                }
            }
            let best = best.ok_or_else(|| {
                SolverError::Invariant(format!("infoset at row {} has no legal action", i))
            })?;
            value = row[best];

            if let Some((parent, action)) = self.parent(i) {
                gradient[parent * MAX_ACTIONS + action] += value;
            }
            if let Some(strat) = strategy.as_deref_mut() {
                strat[i * MAX_ACTIONS + best] = 1.0;
            }
        }

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// root (actions 0, 1)
    /// ├── 0 succeeds -> a (actions 0, 1, 2)
    /// │                 └── 2 succeeds -> c (action 0)
    /// └── 1 fails    -> b (actions 1, 2)
    fn small_treeplex() -> Treeplex {
        let a = InfosetKey::ROOT.child(0, true);
        let b = InfosetKey::ROOT.child(1, false);
        let c = a.child(2, true);

        let mut masks = FxHashMap::default();
        masks.insert(InfosetKey::ROOT, 0b011);
        masks.insert(a, 0b111);
        masks.insert(b, 0b110);
        masks.insert(c, 0b001);
        Treeplex::from_masks(masks).unwrap()
    }

    fn single(mask: ActionMask) -> Treeplex {
        let mut masks = FxHashMap::default();
        masks.insert(InfosetKey::ROOT, mask);
        Treeplex::from_masks(masks).unwrap()
    }

    fn buffer(rows: &[&[f64]]) -> Vec<f64> {
        let mut buf = vec![0.0; rows.len() * MAX_ACTIONS];
        for (i, row) in rows.iter().enumerate() {
            buf[i * MAX_ACTIONS..i * MAX_ACTIONS + row.len()].copy_from_slice(row);
        }
        buf
    }

    fn sample_strategy() -> Vec<f64> {
        buffer(&[&[0.25, 0.75], &[0.2, 0.3, 0.5], &[0.0, 0.4, 0.6], &[1.0]])
    }

    #[test]
    fn test_topological_order() {
        let tpx = small_treeplex();

        assert_eq!(tpx.num_infosets(), 4);
        assert_eq!(tpx.infoset_keys()[0], InfosetKey::ROOT);
        assert!(tpx.infoset_keys().windows(2).all(|w| w[0] < w[1]));
        assert_eq!(tpx.parent_index()[0], NO_PARENT);
        for i in 1..tpx.num_infosets() {
            assert!((tpx.parent_index()[i] as usize) < i);
        }
        assert_eq!(tpx.parent_index(), &[NO_PARENT, 0, 0, 1]);
        assert_eq!(tpx.parent(3), Some((1, 2)));
        assert_eq!(tpx.parent(0), None);
        assert_eq!(tpx.infoset_id(InfosetKey::ROOT.child(1, false)), Some(2));
        assert_eq!(tpx.infoset_id(InfosetKey::ROOT.child(1, true)), None);
    }

    #[test]
    fn test_metadata_lookup() {
        let tpx = small_treeplex();
        let b = InfosetKey::ROOT.child(1, false);

        let md = tpx.metadata(b).unwrap();
        assert_eq!(md.infoset_id, 2);
        assert_eq!(md.legal_actions, 0b110);
        assert_eq!(md.legal_actions, tpx.legal_actions()[md.infoset_id as usize]);
        assert!(tpx.metadata(b.child(1, true)).is_none());
    }

    #[test]
    fn test_from_masks_rejects_broken_trees() {
        let mut no_root = FxHashMap::default();
        no_root.insert(InfosetKey::ROOT.child(0, true), 0b1);
        assert!(matches!(
            Treeplex::from_masks(no_root),
            Err(SolverError::Invariant(_))
        ));

        let mut orphan = FxHashMap::default();
        orphan.insert(InfosetKey::ROOT, 0b1);
        orphan.insert(InfosetKey::ROOT.child(0, true).child(0, true), 0b1);
        assert!(matches!(
            Treeplex::from_masks(orphan),
            Err(SolverError::Invariant(_))
        ));

        let mut illegal_parent_action = FxHashMap::default();
        illegal_parent_action.insert(InfosetKey::ROOT, 0b010);
        illegal_parent_action.insert(InfosetKey::ROOT.child(0, true), 0b1);
        assert!(matches!(
            Treeplex::from_masks(illegal_parent_action),
            Err(SolverError::Invariant(_))
        ));

        let mut empty_mask = FxHashMap::default();
        empty_mask.insert(InfosetKey::ROOT, 0);
        assert!(matches!(
            Treeplex::from_masks(empty_mask),
            Err(SolverError::Invariant(_))
        ));
    }

    #[test]
    fn test_set_uniform_is_valid() {
        let tpx = small_treeplex();
        let mut buf = vec![0.7; tpx.buffer_len()];
        tpx.set_uniform(&mut buf).unwrap();

        tpx.validate_strategy(&buf).unwrap();
        assert_abs_diff_eq!(buf[0], 0.5);
        assert_abs_diff_eq!(buf[9 + 2], 1.0 / 3.0);
        assert_eq!(buf[18], 0.0);
        assert_eq!(buf, tpx.uniform_strategy());
    }

    #[test]
    fn test_validation_errors() {
        let tpx = small_treeplex();

        assert!(matches!(
            tpx.validate_strategy(&[0.0; 9]),
            Err(SolverError::Shape { expected: 36, found: 9 })
        ));

        let mut illegal = sample_strategy();
        illegal[2] = 0.1;
        assert!(matches!(tpx.validate_strategy(&illegal), Err(SolverError::Invariant(_))));
        assert!(matches!(tpx.validate_vector(&illegal), Err(SolverError::Invariant(_))));

        let mut bad_sum = sample_strategy();
        bad_sum[0] = 0.3;
        assert!(matches!(tpx.validate_strategy(&bad_sum), Err(SolverError::Invariant(_))));
        tpx.validate_vector(&bad_sum).unwrap();

        let mut negative = sample_strategy();
        negative[0] = -0.25;
        negative[1] = 1.25;
        assert!(matches!(tpx.validate_strategy(&negative), Err(SolverError::Invariant(_))));
    }

    #[test]
    fn test_bh_to_sf() {
        let tpx = small_treeplex();
        let mut buf = sample_strategy();
        tpx.bh_to_sf(&mut buf).unwrap();

        let expected = buffer(&[
            &[0.25, 0.75],
            &[0.05, 0.075, 0.125],
            &[0.0, 0.3, 0.45],
            &[0.125],
        ]);
        for (x, y) in buf.iter().zip(&expected) {
            assert_abs_diff_eq!(x, y, epsilon = 1e-12);
        }
        tpx.validate_vector(&buf).unwrap();
    }

    #[test]
    fn test_sf_to_bh_round_trip() {
        let tpx = small_treeplex();
        let bh = buffer(&[&[0.4, 0.6], &[0.2, 0.3, 0.5], &[0.0, 0.4, 0.6], &[1.0]]);
        let mut buf = bh.clone();
        tpx.bh_to_sf(&mut buf).unwrap();
        tpx.sf_to_bh(&mut buf).unwrap();

        tpx.validate_strategy(&buf).unwrap();
        for (x, y) in buf.iter().zip(&bh) {
            assert_abs_diff_eq!(x, y, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_sf_to_bh_unreached_row_is_uniform() {
        let tpx = small_treeplex();
        let mut buf = buffer(&[&[1.0, 0.0], &[0.5, 0.25, 0.25], &[0.0, 0.0, 0.0], &[0.25]]);
        tpx.sf_to_bh(&mut buf).unwrap();

        assert_abs_diff_eq!(buf[2 * 9 + 1], 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(buf[2 * 9 + 2], 0.5, epsilon = 1e-9);
        tpx.validate_strategy(&buf).unwrap();
    }

    #[test]
    fn test_regret_to_bh_nonpositive_row_is_uniform() {
        let tpx = single(0b111);
        let mut buf = buffer(&[&[-1.0, 0.0, -3.0]]);
        tpx.regret_to_bh(&mut buf).unwrap();

        for j in 0..3 {
            assert_abs_diff_eq!(buf[j], 1.0 / 3.0, epsilon = 1e-12);
        }
        tpx.validate_strategy(&buf).unwrap();
    }

    #[test]
    fn test_regret_to_bh_clips_and_normalizes() {
        let tpx = single(0b111);
        let mut buf = buffer(&[&[1.0, 3.0, -2.0]]);
        tpx.regret_to_bh(&mut buf).unwrap();

        assert_abs_diff_eq!(buf[0], 0.25);
        assert_abs_diff_eq!(buf[1], 0.75);
        assert_eq!(buf[2], 0.0);
    }

    #[test]
    fn test_relu_normalize_zeroes_illegal_slots() {
        let mut row = [2.0, 5.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        relu_normalize(&mut row, 0b101).unwrap();
        assert_eq!(row[1], 0.0);
        assert_abs_diff_eq!(row[0], 0.5);
        assert_abs_diff_eq!(row[2], 0.5);
    }

    #[test]
    fn test_relu_normalize_rejects_empty_mask() {
        let mut row = [1.0; MAX_ACTIONS];
        assert!(matches!(
            relu_normalize(&mut row, 0),
            Err(SolverError::Invariant(_))
        ));
        assert!(matches!(
            relu_normalize(&mut row[..4], 0b1),
            Err(SolverError::Shape { .. })
        ));
    }

    #[test]
    fn test_br_single_action() {
        let tpx = single(0b1);
        let mut gradient = buffer(&[&[2.5]]);
        let mut strat = vec![0.0; 9];

        let value = tpx.br(&mut gradient, Some(&mut strat)).unwrap();
        assert_eq!(value, 2.5);
        assert_eq!(gradient[0], 2.5);
        assert_eq!(strat[0], 1.0);
    }

    #[test]
    fn test_br_backward_induction() {
        let tpx = small_treeplex();
        let mut gradient = buffer(&[&[1.0, 0.0], &[0.5, -1.0, 0.2], &[0.0, 0.1, 0.3], &[0.4]]);
        let mut strat = vec![0.0; tpx.buffer_len()];

        let value = tpx.br(&mut gradient, Some(&mut strat)).unwrap();

        assert_abs_diff_eq!(value, 1.6, epsilon = 1e-12);
        assert_abs_diff_eq!(gradient[0], 1.6, epsilon = 1e-12);
        assert_abs_diff_eq!(gradient[1], 0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(gradient[9 + 2], 0.6, epsilon = 1e-12);
        assert_eq!(strat, buffer(&[&[1.0, 0.0], &[0.0, 0.0, 1.0], &[0.0, 0.0, 1.0], &[1.0]]));
        tpx.validate_strategy(&strat).unwrap();
    }

    #[test]
    fn test_br_without_strategy_output() {
        let tpx = small_treeplex();
        let mut gradient = buffer(&[&[1.0, 0.0], &[0.5, -1.0, 0.2], &[0.0, 0.1, 0.3], &[0.4]]);
        let value = tpx.br(&mut gradient, None).unwrap();
        assert_abs_diff_eq!(value, 1.6, epsilon = 1e-12);
    }

    #[test]
    fn test_infoset_desc() {
        let tpx = small_treeplex();
        assert_eq!(tpx.infoset_desc(0).unwrap(), "");
        assert_eq!(tpx.infoset_desc(3).unwrap(), "0*2*");
        assert!(matches!(tpx.infoset_desc(4), Err(SolverError::Usage(_))));
    }
}
