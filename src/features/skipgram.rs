//! Skip-gram enumeration and the sentiment sum over generated grams.
//!
//! A gram starts at some position `h` and picks its remaining `n - 1` items
//! from the next `n - 1 + k` positions, in order. With `k = 0` this is the
//! plain n-gram sequence.

use crate::sentiment::SentimentScorer;

/// Lazy, finite iterator over skip-grams of a slice. Clone it to restart.
#[derive(Debug, Clone)]
pub struct SkipGrams<'a, T> {
    items: &'a [T],
    n: usize,
    k: usize,
    head: usize,
    tail: Option<Vec<usize>>,
}

pub fn skip_grams<T>(items: &[T], n: usize, k: usize) -> SkipGrams<'_, T> {
    SkipGrams {
        items,
        n,
        k,
        head: 0,
        tail: None,
    }
}

impl<'a, T> Iterator for SkipGrams<'a, T> {
    type Item = Vec<&'a T>;

    fn next(&mut self) -> Option<Self::Item> {
        let len = self.items.len();
        let m = self.n.checked_sub(1)?;
        loop {
            if self.head >= len {
                return None;
            }
            let head = self.head;
            let hi = (head + m + self.k).min(len - 1);
            let tail = match self.tail.take() {
                Some(t) => t,
                None => (head + 1..=head + m).collect::<Vec<_>>(),
            };
            if tail.last().is_some_and(|&last| last > hi) {
                self.head += 1;
                continue;
            }

            // next combination of tail positions within (head, hi]
            let mut succ = tail.clone();
            let mut advanced = false;
            for i in (0..m).rev() {
                if succ[i] < hi - (m - 1 - i) {
                    succ[i] += 1;
                    for j in i + 1..m {
                        succ[j] = succ[j - 1] + 1;
                    }
                    advanced = true;
                    break;
                }
            }
            if advanced {
                self.tail = Some(succ);
            } else {
                self.head += 1;
            }

            let mut gram = Vec::with_capacity(self.n);
            gram.push(&self.items[head]);
            gram.extend(tail.iter().map(|&i| &self.items[i]));
            return Some(gram);
        }
    }
}

/// Sum over every token of every `(n, k)` skip-gram: +1 strictly positive,
/// -1 strictly negative.
pub fn skip_gram_sentiment<S: AsRef<str>>(
    tokens: &[S],
    n: usize,
    k: usize,
    scorer: &dyn SentimentScorer,
) -> anyhow::Result<i64> {
    // one verdict per position; grams reuse it
    let signs = tokens
        .iter()
        .map(|t| Ok(scorer.score(t.as_ref())?.polarity().sign()))
        .collect::<anyhow::Result<Vec<i64>>>()?;
    Ok(skip_grams(&signs, n, k)
        .map(|g| g.into_iter().sum::<i64>())
        .sum())
}
