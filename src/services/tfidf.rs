use std::collections::{HashMap, HashSet};

use crate::models::DocumentVector;

/// Term frequency: count of each distinct term over the total token count
///
/// Empty input yields an empty vector. Non-empty results sum to 1.
pub fn term_frequency(tokens: &[String]) -> DocumentVector {
    let total = tokens.len();
    if total == 0 {
        return DocumentVector::new();
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in tokens {
        *counts.entry(token).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(term, count)| (term.to_string(), count as f64 / total as f64))
        .collect()
}

/// Smoothed inverse document frequency across a document set
///
/// For each term appearing in at least one document's distinct token set:
/// `idf = ln((D + 1) / (df + 1)) + 1`. The add-one smoothing keeps every
/// value strictly positive and damps rare-term dominance.
pub fn inverse_document_frequency(documents: &[Vec<String>]) -> DocumentVector {
    let total_docs = documents.len();
    if total_docs == 0 {
        return DocumentVector::new();
    }

    let mut doc_counts: HashMap<&str, usize> = HashMap::new();
    for tokens in documents {
        let unique_terms: HashSet<&str> = tokens.iter().map(String::as_str).collect();
        for term in unique_terms {
            *doc_counts.entry(term).or_insert(0) += 1;
        }
    }

    doc_counts
        .into_iter()
        .map(|(term, df)| {
            let idf = ((total_docs as f64 + 1.0) / (df as f64 + 1.0)).ln() + 1.0;
            (term.to_string(), idf)
        })
        .collect()
}

/// TF × IDF per term of the term-frequency vector
///
/// Terms absent from the IDF table contribute weight 0.
pub fn tf_idf(tf: &DocumentVector, idf: &DocumentVector) -> DocumentVector {
    tf.iter()
        .map(|(term, &weight)| (term.clone(), weight * idf.get(term).copied().unwrap_or(0.0)))
        .collect()
}

/// Cosine similarity between two sparse weighted-term vectors
///
/// The dot product runs over the intersection of term keys; the magnitudes
/// run over all terms of each vector. Returns 0 when the intersection is
/// empty or either magnitude is 0, so the two vectors may come from
/// independent term universes.
pub fn cosine_similarity(a: &DocumentVector, b: &DocumentVector) -> f64 {
    let dot_product: f64 = a
        .iter()
        .filter_map(|(term, &weight)| b.get(term).map(|other| weight * other))
        .sum();

    let magnitude_a = magnitude(a);
    let magnitude_b = magnitude(b);

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}

fn magnitude(vector: &DocumentVector) -> f64 {
    vector.values().map(|v| v * v).sum::<f64>().sqrt()
}
