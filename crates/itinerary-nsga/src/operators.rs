use rand::Rng;

/// Order crossover: keeps a random slice of `first` in place and fills the
/// other positions with the remaining genes in `second`'s order.
pub fn order_crossover<R: Rng>(first: &[usize], second: &[usize], rng: &mut R) -> Vec<usize> {
    let n = first.len();
    if n < 2 {
        return first.to_vec();
    }
    let a = rng.gen_range(0..n);
    let b = rng.gen_range(0..n);
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };

    let mut taken = vec![false; n];
    for &gene in &first[lo..=hi] {
        taken[gene] = true;
    }
    let mut fill = second.iter().copied().filter(|&gene| !taken[gene]);

    let mut child = Vec::with_capacity(n);
    for pos in 0..n {
        if (lo..=hi).contains(&pos) {
            child.push(first[pos]);
        } else if let Some(gene) = fill.next() {
            child.push(gene);
        }
    }
    child
}

/// Swaps each gene with a random position with probability `per_gene`.
pub fn swap_mutation<R: Rng>(genome: &mut [usize], per_gene: f64, rng: &mut R) {
    let n = genome.len();
    if n < 2 {
        return;
    }
    for i in 0..n {
        if rng.gen_bool(per_gene) {
            let j = rng.gen_range(0..n - 1);
            // skip over i so the swap always moves something
            let j = if j >= i { j + 1 } else { j };
            genome.swap(i, j);
        }
    }
}

/// Moves one random gene to another random position.
pub fn insert_mutation<R: Rng>(genome: &mut Vec<usize>, rng: &mut R) {
    let n = genome.len();
    if n < 2 {
        return;
    }
    let from = rng.gen_range(0..n);
    let to = rng.gen_range(0..n);
    if from != to {
        let gene = genome.remove(from);
        genome.insert(to, gene);
    }
}
