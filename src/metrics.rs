//! Per-category classification metrics
//!
//! A misclassified box costs recall for its true category and precision for
//! the guessed category; a correct one credits the true category.

/// True/false positive and false negative counts for one category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryMetrics {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl CategoryMetrics {
    /// tp / (tp + fp), 0 when nothing was predicted as this category
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    /// tp / (tp + fn), 0 when the category never occurs in truth
    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    /// Harmonic mean of precision and recall
    pub fn f_score(&self) -> f64 {
        let precision = self.precision();
        let recall = self.recall();
        if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
