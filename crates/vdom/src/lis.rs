//! Longest increasing subsequence over a `source` array.
//!
//! Entries are `old_index + 1`; `0` marks a position with no old counterpart and
//! never takes part in the subsequence. The result lists positions (not values)
//! in ascending order. Patience sorting with predecessor links, O(n log n).

pub fn longest_increasing_subsequence(seq: &[usize]) -> Vec<usize> {
    // tails[k]: position of the smallest tail value of any run of length k + 1.
    let mut tails: Vec<usize> = Vec::with_capacity(seq.len());
    let mut predecessor: Vec<Option<usize>> = vec![None; seq.len()];

    for (i, &value) in seq.iter().enumerate() {
        if value == 0 {
            continue;
        }
        match tails.last().copied() {
            None => {
                tails.push(i);
                continue;
            }
            Some(last) if seq[last] < value => {
                predecessor[i] = Some(last);
                tails.push(i);
                continue;
            }
            Some(_) => {}
        }
        let slot = tails.partition_point(|&t| seq[t] < value);
        if value < seq[tails[slot]] {
            if slot > 0 {
                predecessor[i] = Some(tails[slot - 1]);
            }
            tails[slot] = i;
        }
    }

    let mut out = vec![0; tails.len()];
    let mut cursor = tails.last().copied();
    for slot in out.iter_mut().rev() {
        let Some(position) = cursor else {
            break;
        };
        *slot = position;
        cursor = predecessor[position];
    }
    out
}
