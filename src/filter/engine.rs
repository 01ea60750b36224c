use super::compiler::TestPlan;
use super::index::ChannelNameIndex;
use super::predicate::Diagnostics;
use crate::document::{ClumpIdx, Listings, Programme};
use std::collections::HashMap;

/// Snapshot of clump-group membership, keyed by `(channel, start)` and taken
/// before any keep/drop decision. Repair must see the final surviving set of
/// each group, so it runs as a batch pass after filtering, never one removal
/// at a time.
#[derive(Debug)]
pub struct ClumpGroups {
    groups: HashMap<(String, String), Vec<usize>>,
}

impl ClumpGroups {
    pub fn snapshot(programmes: &[Programme]) -> Self {
        let mut groups: HashMap<(String, String), Vec<usize>> = HashMap::new();
        for (i, prog) in programmes.iter().enumerate() {
            groups
                .entry((prog.channel.clone(), prog.start.clone()))
                .or_default()
                .push(i);
        }
        ClumpGroups { groups }
    }

    /// Renumber the clump indices of every group that lost at least one
    /// member, so survivors read `0/N' .. (N'-1)/N'` in their original
    /// relative order. A group reduced to a single survivor loses its clump
    /// marking. Groups that kept all members are untouched, which is what
    /// makes a second filtering pass over repaired output a no-op.
    pub fn repair(&self, programmes: &mut [Programme], keep: &[bool]) {
        for members in self.groups.values() {
            if members.len() < 2 {
                continue;
            }
            // Sharing a timeslot only makes a clump if the records say so.
            if !members.iter().any(|&i| programmes[i].clumpidx.is_some()) {
                continue;
            }
            let survivors: Vec<usize> = members.iter().copied().filter(|&i| keep[i]).collect();
            if survivors.len() == members.len() {
                continue;
            }
            if let [sole] = survivors.as_slice() {
                programmes[*sole].clumpidx = None;
                continue;
            }
            let total = survivors.len() as u32;
            for (position, &i) in survivors.iter().enumerate() {
                programmes[i].clumpidx = Some(ClumpIdx {
                    position: position as u32,
                    total,
                });
            }
        }
    }
}

/// Applies a compiled plan to a listings document.
///
/// Channels: when the plan has channel tests, a channel survives iff some
/// conjunction holds for it; otherwise every channel survives, even one with
/// no remaining programmes. Programmes: a programme survives iff some
/// programme conjunction holds. Dropping a programme triggers clump repair
/// for its timeslot group.
pub struct FilterEngine<'a> {
    plan: &'a TestPlan,
    index: &'a ChannelNameIndex,
}

impl<'a> FilterEngine<'a> {
    pub fn new(plan: &'a TestPlan, index: &'a ChannelNameIndex) -> Self {
        FilterEngine { plan, index }
    }

    pub fn apply(&self, listings: Listings, diagnostics: &mut Diagnostics) -> Listings {
        let Listings {
            encoding,
            credits,
            channels,
            mut programmes,
        } = listings;

        let channels = if self.plan.has_channel_tests() {
            channels
                .into_iter()
                .filter(|channel| self.plan.matches_channel(channel, self.index))
                .collect()
        } else {
            channels
        };

        let groups = ClumpGroups::snapshot(&programmes);
        let keep: Vec<bool> = programmes
            .iter_mut()
            .map(|prog| self.plan.matches_programme(prog, self.index, diagnostics))
            .collect();
        groups.repair(&mut programmes, &keep);

        let programmes = programmes
            .into_iter()
            .zip(keep)
            .filter_map(|(prog, kept)| kept.then_some(prog))
            .collect();

        Listings {
            encoding,
            credits,
            channels,
            programmes,
        }
    }
}
