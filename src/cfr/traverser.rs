//! Game-tree traversal: infoset discovery, gradients and exploitability.
//!
//! Both traversals split the tree on the first two plies. Every partition is
//! walked independently with an explicit stack, so the work fans out over
//! the rayon pool without any shared mutable state in the hot loop:
//! discovery merges partition-local maps under a mutex, and gradient
//! accumulation folds into per-worker buffers that are summed at the end.

use std::collections::hash_map::Entry;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use log::{debug, info};
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::cfr::averager::Averager;
use crate::cfr::error::{check_player, SolverError, SolverResult};
use crate::cfr::game::{GameState, Outcome};
use crate::cfr::infoset::{
    legal_actions, ActionMask, InfosetKey, Player, FULL_MASK, MAX_ACTIONS,
};
use crate::cfr::treeplex::{dot, Treeplex};

/// Depth of the prefix that defines a partition.
const PARTITION_PLIES: usize = 2;

/// Initial stack capacity; enough for 18 plies of 9 actions each.
const STACK_CAPACITY: usize = 18 * MAX_ACTIONS;

/// Allowed mismatch between `ev0` and `-ev1`.
const EV_TOLERANCE: f64 = 1e-3;

/// Actions forced on the first plies of a partition.
type Prefix = Vec<usize>;

type InfosetMasks = FxHashMap<InfosetKey, ActionMask>;

/// Gradients over both treeplexes plus each player's empty-sequence value.
type GradientAcc = ([Vec<f64>; 2], [f64; 2]);

/// Expected value, gradients and exploitability of a strategy pair.
#[derive(Debug, Clone)]
pub struct EvExpl {
    /// Expected payoff of player 0.
    pub ev0: f64,
    /// Gradient of each player's utility with respect to its sequence-form
    /// strategy.
    pub gradient: [Vec<f64>; 2],
    /// `expl[0]` is how much a best-responding player 1 gains against
    /// player 0, and vice versa.
    pub expl: [f64; 2],
    /// `best_response[0]` is player 0's best response to player 1's
    /// strategy, and vice versa.
    pub best_response: [Vec<f64>; 2],
}

impl EvExpl {
    /// Average exploitability of the two players.
    pub fn nash_gap(&self) -> f64 {
        (self.expl[0] + self.expl[1]) / 2.0
    }
}

/// Owns both players' treeplexes for the game `G` and the gradient buffers.
#[derive(Debug)]
pub struct Traverser<G: GameState> {
    pub(crate) treeplex: [Arc<Treeplex>; 2],
    pub(crate) gradients: [Vec<f64>; 2],
    /// Payoff collected on terminals reached before the player ever acted.
    empty_values: [f64; 2],
    sf_strategies: [Vec<f64>; 2],
    partitions: Vec<Prefix>,
    _game: PhantomData<G>,
}

impl<G: GameState> Traverser<G> {
    /// Enumerate the whole game tree and build both treeplexes.
    ///
    /// # Errors
    /// [`SolverError::Invariant`] if the game violates the `GameState`
    /// contract: two occurrences of the same infoset with different legal
    /// actions, a non-terminal state without legal actions, or a broken
    /// parent chain.
    pub fn new() -> SolverResult<Self> {
        let partitions = partition_prefixes(&G::default());
        info!(
            "discovering infosets ({} partitions, {} threads)...",
            partitions.len(),
            rayon::current_num_threads()
        );
        let start = Instant::now();

        let global: Mutex<[InfosetMasks; 2]> = Mutex::new(Default::default());
        let nodes = AtomicU64::new(0);

        partitions
            .par_iter()
            .enumerate()
            .try_for_each(|(i, prefix)| -> SolverResult<()> {
                let (local, count) = discover_partition::<G>(prefix)?;
                nodes.fetch_add(count, Ordering::Relaxed);
                debug!(
                    "  > partition {:02} found {} infosets ({} nodes)",
                    i,
                    local[0].len() + local[1].len(),
                    count
                );

                let mut global = global.lock().map_err(|_| poisoned())?;
                for (player, map) in local.into_iter().enumerate() {
                    merge_infosets(&mut global[player], map, player)?;
                }
                Ok(())
            })?;

        let [masks0, masks1] = global.into_inner().map_err(|_| poisoned())?;
        info!(
            "... discovery terminated. Found {} infosets across {} nodes in {:.2}s",
            masks0.len() + masks1.len(),
            nodes.load(Ordering::Relaxed),
            start.elapsed().as_secs_f64()
        );

        info!("sorting infosets and assigning indices...");
        let (tpx0, tpx1) = rayon::join(
            || Treeplex::from_masks(masks0),
            || Treeplex::from_masks(masks1),
        );
        let treeplex = [Arc::new(tpx0?), Arc::new(tpx1?)];
        info!(
            "... all done ({} + {} infosets)",
            treeplex[0].num_infosets(),
            treeplex[1].num_infosets()
        );

        let buffers = || {
            [
                vec![0.0; treeplex[0].buffer_len()],
                vec![0.0; treeplex[1].buffer_len()],
            ]
        };
        let gradients = buffers();
        let sf_strategies = buffers();

        Ok(Self {
            treeplex,
            gradients,
            empty_values: [0.0; 2],
            sf_strategies,
            partitions,
            _game: PhantomData,
        })
    }

    /// Treeplex of `player`.
    pub fn treeplex(&self, player: Player) -> SolverResult<&Arc<Treeplex>> {
        check_player(player)?;
        Ok(&self.treeplex[player])
    }

    /// Number of infosets of `player`.
    pub fn num_infosets(&self, player: Player) -> SolverResult<usize> {
        Ok(self.treeplex(player)?.num_infosets())
    }

    /// Description of `player`'s infoset at `row`.
    pub fn infoset_desc(&self, player: Player, row: usize) -> SolverResult<String> {
        self.treeplex(player)?.infoset_desc(row)
    }

    /// Gradient of `player` from the last [`Traverser::compute_gradients`].
    pub fn gradient(&self, player: Player) -> SolverResult<&[f64]> {
        check_player(player)?;
        Ok(&self.gradients[player])
    }

    /// Value of `player`'s empty sequence from the last
    /// [`Traverser::compute_gradients`]: the payoff, weighted by the
    /// opponent's reach, of terminals hit before `player` ever acts.
    pub fn empty_sequence_value(&self, player: Player) -> SolverResult<f64> {
        check_player(player)?;
        Ok(self.empty_values[player])
    }

    /// Number of independent subtree tasks per traversal.
    pub fn num_partitions(&self) -> usize {
        self.partitions.len()
    }

    /// Uniform behavioral strategies for both players.
    pub fn uniform_strategies(&self) -> [Vec<f64>; 2] {
        [
            self.treeplex[0].uniform_strategy(),
            self.treeplex[1].uniform_strategy(),
        ]
    }

    /// Averager over `player`'s treeplex.
    pub fn new_averager(&self, player: Player) -> SolverResult<Averager> {
        check_player(player)?;
        Ok(Averager::new(self.treeplex[player].clone()))
    }

    /// Compute both players' gradients for the behavioral `strategies`.
    ///
    /// At every terminal won by player `w`, with `s = 1` if `w == 0` else
    /// `-1`, player 0's sequence gains `s` times player 1's reach and player
    /// 1's sequence loses `s` times player 0's reach. A player who has not
    /// acted yet is on the empty sequence, whose value is kept apart (see
    /// [`Traverser::empty_sequence_value`]).
    pub fn compute_gradients(&mut self, strategies: [&[f64]; 2]) -> SolverResult<()> {
        debug!(
            "begin gradient computation ({} threads)...",
            rayon::current_num_threads()
        );
        for (tpx, strategy) in self.treeplex.iter().zip(strategies) {
            tpx.validate_strategy(strategy)?;
        }
        self.compute_sf_strategies(strategies)?;

        let lens = [self.treeplex[0].buffer_len(), self.treeplex[1].buffer_len()];
        let zero = move || -> GradientAcc {
            ([vec![0.0; lens[0]], vec![0.0; lens[1]]], [0.0; 2])
        };
        let treeplex = &self.treeplex;
        let sf = &self.sf_strategies;

        let (gradients, empty_values) = self
            .partitions
            .par_iter()
            .try_fold(zero, |mut acc, prefix| {
                accumulate_partition::<G>(prefix, treeplex, sf, &mut acc)?;
                Ok::<_, SolverError>(acc)
            })
            .try_reduce(zero, |(mut a, mut ea), (b, eb)| {
                for (dst, src) in a.iter_mut().zip(&b) {
                    for (x, y) in dst.iter_mut().zip(src) {
                        *x += y;
                    }
                }
                ea[0] += eb[0];
                ea[1] += eb[1];
                Ok((a, ea))
            })?;

        self.gradients = gradients;
        self.empty_values = empty_values;
        debug!("... all done.");
        Ok(())
    }

    /// Expected value, exploitability and best responses for `strategies`.
    ///
    /// # Errors
    /// Validation errors of the strategies, or [`SolverError::Invariant`] if
    /// `ev0` and `-ev1` differ by more than 1e-3.
    pub fn ev_and_exploitability(&mut self, strategies: [&[f64]; 2]) -> SolverResult<EvExpl> {
        info!("begin exploitability computation...");
        self.compute_gradients(strategies)?;
        let ev0 = self.expected_value()?;

        let gradient = self.gradients.clone();
        let mut scratch = self.gradients.clone();
        let mut best_response = [
            vec![0.0; self.treeplex[0].buffer_len()],
            vec![0.0; self.treeplex[1].buffer_len()],
        ];

        let [g0, g1] = &mut scratch;
        let [br0, br1] = &mut best_response;
        let (tpx0, tpx1) = (&self.treeplex[0], &self.treeplex[1]);
        let (v0, v1) = rayon::join(
            || tpx0.br(g0, Some(br0.as_mut_slice())),
            || tpx1.br(g1, Some(br1.as_mut_slice())),
        );
        let v0 = v0? + self.empty_values[0];
        let v1 = v1? + self.empty_values[1];
        let expl = [ev0 + v1, -ev0 + v0];

        info!(
            "... all done. (ev0 = {:.6}, expl = {:.6}, {:.6})",
            ev0, expl[0], expl[1]
        );
        Ok(EvExpl {
            ev0,
            gradient,
            expl,
            best_response,
        })
    }

    /// Player 0's expected value under the last computed gradients, checked
    /// against player 1's.
    fn expected_value(&self) -> SolverResult<f64> {
        let ev = |p: usize| {
            dot(&self.sf_strategies[p], &self.gradients[p]) + self.empty_values[p]
        };
        let (ev0, ev1) = (ev(0), ev(1));
        if (ev0 + ev1).abs() >= EV_TOLERANCE {
            return Err(SolverError::Invariant(format!(
                "expected values differ: {:.6} != {:.6}",
                ev0, -ev1
            )));
        }
        Ok(ev0)
    }

    fn compute_sf_strategies(&mut self, strategies: [&[f64]; 2]) -> SolverResult<()> {
        let [sf0, sf1] = &mut self.sf_strategies;
        let (tpx0, tpx1) = (&self.treeplex[0], &self.treeplex[1]);
        let (r0, r1) = rayon::join(
            || {
                sf0.copy_from_slice(strategies[0]);
                tpx0.bh_to_sf(sf0)
            },
            || {
                sf1.copy_from_slice(strategies[1]);
                tpx1.bh_to_sf(sf1)
            },
        );
        r0?;
        r1?;
        Ok(())
    }
}

fn poisoned() -> SolverError {
    SolverError::Invariant("infoset map lock poisoned".to_string())
}

/// All action prefixes of length `PARTITION_PLIES` from `root`, or shorter
/// where the game ends earlier.
fn partition_prefixes<G: GameState>(root: &G) -> Vec<Prefix> {
    let mut out = Vec::new();
    let mut stack = vec![(root.clone(), Prefix::new())];

    while let Some((state, prefix)) = stack.pop() {
        if prefix.len() == PARTITION_PLIES || state.is_terminal() {
            out.push(prefix);
            continue;
        }
        for action in legal_actions(state.available_actions()) {
            let mut child = state.clone();
            child.next(action);
            let mut child_prefix = prefix.clone();
            child_prefix.push(action);
            stack.push((child, child_prefix));
        }
    }

    out.sort_unstable();
    out
}

/// Actions to expand at `depth`: the forced prefix action, or all of `mask`.
#[inline]
fn branch(mask: ActionMask, prefix: &[usize], depth: usize) -> ActionMask {
    match prefix.get(depth) {
        Some(&action) => mask & (1 << action),
        None => mask,
    }
}

fn mask_mismatch(player: Player, key: InfosetKey, a: ActionMask, b: ActionMask) -> SolverError {
    SolverError::Invariant(format!(
        "infoset {} of player {} seen with legal actions {:#b} and {:#b}",
        key.raw(),
        player,
        a,
        b
    ))
}

/// Walk one partition and collect its infosets.
fn discover_partition<G: GameState>(prefix: &[usize]) -> SolverResult<([InfosetMasks; 2], u64)> {
    let mut infosets: [InfosetMasks; 2] = Default::default();
    let mut stack: Vec<(G, usize)> = Vec::with_capacity(STACK_CAPACITY);
    stack.push((G::default(), 0));
    let mut count = 0u64;

    while let Some((state, depth)) = stack.pop() {
        count += 1;
        if state.is_terminal() {
            continue;
        }

        let player = state.player();
        if player > 1 {
            return Err(SolverError::Invariant(format!("invalid player {}", player)));
        }
        let mask = state.available_actions();
        if mask == 0 || mask & !FULL_MASK != 0 {
            return Err(SolverError::Invariant(format!(
                "non-terminal state with legal-action mask {:#b}: {:?}",
                mask, state
            )));
        }

        let key = state.infoset();
        match infosets[player].entry(key) {
            Entry::Occupied(e) if *e.get() != mask => {
                return Err(mask_mismatch(player, key, *e.get(), mask));
            }
            Entry::Occupied(_) => {}
            Entry::Vacant(e) => {
                e.insert(mask);
            }
        }

        for action in legal_actions(branch(mask, prefix, depth)) {
            let mut child = state.clone();
            child.next(action);
            stack.push((child, depth + 1));
        }
    }

    Ok((infosets, count))
}

fn merge_infosets(
    global: &mut InfosetMasks,
    local: InfosetMasks,
    player: Player,
) -> SolverResult<()> {
    for (key, mask) in local {
        match global.entry(key) {
            Entry::Occupied(e) if *e.get() != mask => {
                return Err(mask_mismatch(player, key, *e.get(), mask));
            }
            Entry::Occupied(_) => {}
            Entry::Vacant(e) => {
                e.insert(mask);
            }
        }
    }
    Ok(())
}

/// Add one partition's terminal payoffs into `acc`.
fn accumulate_partition<G: GameState>(
    prefix: &[usize],
    treeplex: &[Arc<Treeplex>; 2],
    sf: &[Vec<f64>; 2],
    acc: &mut GradientAcc,
) -> SolverResult<()> {
    let (gradients, empty_values) = acc;
    // Last sequence of each player; `None` until that player has acted.
    let mut stack: Vec<(G, [Option<usize>; 2], usize)> = Vec::with_capacity(STACK_CAPACITY);
    stack.push((G::default(), [None, None], 0));

    while let Some((state, seqs, depth)) = stack.pop() {
        match state.winner() {
            Some(Outcome::Win(winner)) => {
                let sign = if winner == 0 { 1.0 } else { -1.0 };
                let reach = |p: usize| seqs[p].map_or(1.0, |s| sf[p][s]);
                let value0 = sign * reach(1);
                match seqs[0] {
                    Some(s0) => gradients[0][s0] += value0,
                    None => empty_values[0] += value0,
                }
                let value1 = -sign * reach(0);
                match seqs[1] {
                    Some(s1) => gradients[1][s1] += value1,
                    None => empty_values[1] += value1,
                }
            }
            Some(Outcome::Tie) => {}
            None => {
                let player = state.player();
                let key = state.infoset();
                let id = treeplex[player].infoset_id(key).ok_or_else(|| {
                    SolverError::Invariant(format!(
                        "infoset {} of player {} was not discovered",
                        key.raw(),
                        player
                    ))
                })?;

                for action in legal_actions(branch(state.available_actions(), prefix, depth)) {
                    let mut child = state.clone();
                    child.next(action);
                    let mut child_seqs = seqs;
                    child_seqs[player] = Some(id * MAX_ACTIONS + action);
                    stack.push((child, child_seqs, depth + 1));
                }
            }
        }
    }

    Ok(())
}
