/// A unit of work for the page pool: page `page` of endpoint number `source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTask {
    pub source: usize,
    pub page: u64,
}

/// Round-robin order over the pages of several endpoints.
///
/// Each endpoint contributes its next page in turn, so one huge collection
/// cannot push a small one to the back of the queue. Endpoints join the
/// rotation as their page counts become known; until then they contribute
/// nothing. Produced lazily; nothing proportional to the total page count is
/// allocated.
#[derive(Debug, Clone)]
pub struct PagePlan {
    counts: Vec<u64>,
    next: Vec<u64>,
    cursor: usize,
    remaining: u64,
}

impl PagePlan {
    /// A plan over `sources` endpoints, none of them counted yet.
    pub fn new(sources: usize) -> Self {
        Self {
            counts: vec![0; sources],
            next: vec![0; sources],
            cursor: 0,
            remaining: 0,
        }
    }

    /// Record that endpoint `source` has `pages` pages.
    ///
    /// Counting the same endpoint twice keeps the first count.
    pub fn add(&mut self, source: usize, pages: u64) {
        let Some(count) = self.counts.get_mut(source) else { return };
        if *count != 0 || self.next[source] != 0 {
            return;
        }
        *count = pages;
        self.remaining = self.remaining.saturating_add(pages);
    }

    /// Pages known so far, scheduled or not.
    pub fn total(&self) -> u64 {
        self.counts.iter().fold(0_u64, |acc, n| acc.saturating_add(*n))
    }

    /// Pages known but not yet handed out.
    pub fn pending(&self) -> u64 {
        self.remaining
    }

    /// The next page to request, or `None` when every known page has been
    /// handed out. A later [`add`](Self::add) can make more available.
    pub fn next_task(&mut self) -> Option<PageTask> {
        if self.remaining == 0 {
            return None;
        }
        for _ in 0..self.counts.len() {
            let source = self.cursor;
            self.cursor = (self.cursor + 1) % self.counts.len();
            if self.next[source] < self.counts[source] {
                let page = self.next[source];
                self.next[source] += 1;
                self.remaining -= 1;
                return Some(PageTask { source, page });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(counts: &[u64]) -> PagePlan {
        let mut plan = PagePlan::new(counts.len());
        for (source, pages) in counts.iter().enumerate() {
            plan.add(source, *pages);
        }
        plan
    }

    fn drain(plan: &mut PagePlan) -> Vec<(usize, u64)> {
        std::iter::from_fn(|| plan.next_task())
            .map(|t| (t.source, t.page))
            .collect()
    }

    #[test]
    fn single_endpoint_in_page_order() {
        assert_eq!(drain(&mut plan(&[3])), vec![(0, 0), (0, 1), (0, 2)]);
    }

    #[test]
    fn interleaves_endpoints() {
        assert_eq!(
            drain(&mut plan(&[3, 1, 2])),
            vec![(0, 0), (1, 0), (2, 0), (0, 1), (2, 1), (0, 2)]
        );
    }

    #[test]
    fn empty_endpoints_are_skipped() {
        assert_eq!(drain(&mut plan(&[0, 2, 0])), vec![(1, 0), (1, 1)]);
        assert!(drain(&mut plan(&[0, 0])).is_empty());
        assert!(drain(&mut plan(&[])).is_empty());
    }

    #[test]
    fn covers_every_page_exactly_once() {
        let mut plan = plan(&[5, 17, 1]);
        assert_eq!(plan.total(), 23);
        let mut seen = drain(&mut plan);
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 23);
    }

    #[test]
    fn late_counts_join_the_rotation() {
        let mut plan = PagePlan::new(2);
        assert_eq!(plan.next_task(), None);

        plan.add(1, 2);
        assert_eq!(plan.next_task(), Some(PageTask { source: 1, page: 0 }));

        plan.add(0, 2);
        assert_eq!(plan.pending(), 3);
        assert_eq!(drain(&mut plan), vec![(0, 0), (1, 1), (0, 1)]);
        assert_eq!(plan.next_task(), None);
    }

    #[test]
    fn repeated_and_unknown_counts_are_ignored() {
        let mut plan = PagePlan::new(1);
        plan.add(0, 2);
        plan.add(0, 9);
        plan.add(5, 4);
        assert_eq!(plan.total(), 2);
        assert_eq!(drain(&mut plan).len(), 2);
    }
}
