pub const DEFAULT_CAP: usize = 8;

/// The part of a filtered list that is actually shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window<T> {
    pub visible: Vec<T>,
    pub truncated: bool,
    /// Length of the list before truncation.
    pub total_count: usize,
}

impl<T> Window<T> {
    pub fn hidden_count(&self) -> usize {
        self.total_count.saturating_sub(self.visible.len())
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty() && !self.truncated
    }
}

pub fn window<T>(mut items: Vec<T>, cap: usize, expanded: bool) -> Window<T> {
    let total_count = items.len();
    if expanded || total_count <= cap {
        return Window {
            visible: items,
            truncated: false,
            total_count,
        };
    }
    items.truncate(cap);
    Window {
        visible: items,
        truncated: true,
        total_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_past_cap() {
        let shown = window((0..10).collect(), 6, false);
        assert_eq!(shown.visible, vec![0, 1, 2, 3, 4, 5]);
        assert!(shown.truncated);
        assert_eq!(shown.total_count, 10);
        assert_eq!(shown.hidden_count(), 4);

        let expanded = window((0..10).collect(), 6, true);
        assert_eq!(expanded.visible.len(), 10);
        assert!(!expanded.truncated);
    }

    #[test]
    fn length_is_min_of_len_and_cap() {
        for len in 0..12usize {
            for cap in [0usize, 1, 6, 8] {
                let items: Vec<usize> = (0..len).collect();
                assert_eq!(window(items.clone(), cap, false).visible.len(), len.min(cap));
                assert_eq!(window(items, cap, true).visible.len(), len);
            }
        }
    }

    #[test]
    fn exact_fit_is_not_truncated() {
        let shown = window(vec!['a'; 8], DEFAULT_CAP, false);
        assert!(!shown.truncated);
        assert_eq!(shown.hidden_count(), 0);
    }

    #[test]
    fn empty_window() {
        let shown: Window<u8> = window(Vec::new(), 6, false);
        assert!(shown.is_empty());
        assert_eq!(shown.total_count, 0);
    }

    #[test]
    fn hand_built_window_never_underflows() {
        let shown = Window {
            visible: vec![1, 2, 3],
            truncated: false,
            total_count: 1,
        };
        assert_eq!(shown.hidden_count(), 0);
    }
}
