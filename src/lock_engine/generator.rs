use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;

use crate::error::ConfigError;
use crate::lock_engine::{
    config::OperandRanges,
    models::{Operator, Question},
};

/// Produces random arithmetic questions within the configured ranges.
///
/// Holds no RNG of its own; callers pass one in so a seeded `StdRng`
/// reproduces the same sequence.
#[derive(Debug, Clone)]
pub struct QuestionGenerator {
    ranges: OperandRanges,
}

impl QuestionGenerator {
    /// Fails on ranges that could divide by zero or never yield two
    /// distinct add/sub operands.
    pub fn new(ranges: &OperandRanges) -> Result<Self, ConfigError> {
        ranges.validate()?;
        Ok(QuestionGenerator { ranges: ranges.clone() })
    }

    pub fn ranges(&self) -> &OperandRanges {
        &self.ranges
    }

    /// Pick an operator uniformly and build a question for it.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Question {
        let op = *Operator::ALL.choose(rng).unwrap_or(&Operator::Add);
        self.generate_for(op, rng)
    }

    pub fn generate_for<R: Rng>(&self, op: Operator, rng: &mut R) -> Question {
        let (a, b) = match op {
            Operator::Mul => (self.ranges.mul.sample(rng), self.ranges.mul.sample(rng)),
            Operator::Div => {
                // a = b * q keeps the quotient an exact integer
                let b = self.ranges.divisor.sample(rng);
                let q = self.ranges.quotient.sample(rng);
                (b * q, b)
            }
            Operator::Add | Operator::Sub => self.add_sub_operands(rng),
        };
        let question = Question::new(op, a, b);
        trace!(question = %question.display_text, answer = question.expected_answer, "generated question");
        question
    }

    fn add_sub_operands<R: Rng>(&self, rng: &mut R) -> (i64, i64) {
        let range = self.ranges.add_sub;
        loop {
            let a = range.sample(rng);
            let b = range.sample(rng);
            if !self.ranges.distinct_add_sub || a != b {
                return (a, b);
            }
        }
    }
}
