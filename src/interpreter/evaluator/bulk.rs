use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use rayon::prelude::*;

use crate::{
    ast::{Binding, Expr, VariableId},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::Activation,
            partition::{partition, split_mut},
        },
        value::Value,
    },
    util::num::{range_element, range_len},
};

impl Activation {
    /// `{lower, upper}`: the ints from `lower` to `upper`, both included.
    ///
    /// Both bounds must be ints at runtime and `lower <= upper`. The result
    /// buffer is cut into one disjoint slice per worker and every worker
    /// fills its own slice.
    pub(super) fn eval_range(&mut self, expr: &Expr, lower: &Expr, upper: &Expr) -> Value {
        let (lo, hi) = match (self.eval(lower), self.eval(upper)) {
            (Value::Error, _) | (_, Value::Error) => return Value::Error,
            (Value::Int(lo), Value::Int(hi)) => (lo, hi),
            (lo, hi) => {
                if !matches!(lo, Value::Int(_)) {
                    self.diagnostics
                        .error(lower, RuntimeError::LowerBoundNotInt { found: lo.kind_name() });
                }
                if !matches!(hi, Value::Int(_)) {
                    self.diagnostics
                        .error(upper, RuntimeError::UpperBoundNotInt { found: hi.kind_name() });
                }
                return Value::Error;
            },
        };
        if hi < lo {
            self.diagnostics.error(expr, RuntimeError::InvertedRange);
            return Value::Error;
        }

        let len = match range_len(lo, hi) {
            Ok(len) => len,
            Err(elements) => {
                self.diagnostics.error(expr, RuntimeError::RangeTooLarge { elements });
                return Value::Error;
            },
        };
        let Ok(mut buffer) = self.pool.acquire(len) else {
            self.diagnostics
                .error(expr, RuntimeError::RangeTooLarge { elements: len as u128 });
            return Value::Error;
        };

        buffer.resize(len, Value::Int(lo));
        let ranges = partition(len, self.workers.get());
        split_mut(&mut buffer, &ranges).into_par_iter().for_each(|(start, slice)| {
            let Some(first) = range_element(lo, start) else { return };
            for (slot, value) in slice.iter_mut().zip(first..=hi) {
                *slot = Value::Int(value);
            }
        });

        Value::Sequence(Arc::new(buffer))
    }

    /// `map(argument, param -> body)`: `body` evaluated once per element.
    ///
    /// A uniquely owned argument buffer is overwritten in place, otherwise the
    /// elements are copied into a pooled buffer first. Results land at the
    /// index of their element. If any element evaluates to the error value
    /// the whole map does.
    pub(super) fn eval_map(&mut self, argument: &Expr, param: &Binding, body: &Expr) -> Value {
        let Value::Sequence(values) = self.eval(argument) else {
            return Value::Error;
        };
        let Some(param) = param.id() else {
            return Value::Error;
        };

        let mut buffer = match Arc::try_unwrap(values) {
            Ok(buffer) => buffer,
            Err(shared) => {
                let mut buffer = self.pool.acquire(shared.len()).unwrap_or_default();
                buffer.extend_from_slice(&shared);
                buffer
            },
        };

        let failed = AtomicBool::new(false);
        let ranges = partition(buffer.len(), self.workers.get());
        self.fork_join(split_mut(&mut buffer, &ranges), |worker, (_, slice)| {
                for slot in slice {
                    let element = std::mem::replace(slot, Value::Error);
                    worker.bind(param, element);
                    *slot = worker.eval(body);
                    if slot.is_error() {
                        failed.store(true, Ordering::Relaxed);
                    }
                }
            });

        if failed.into_inner() {
            self.pool.recycle_buffer(buffer);
            return Value::Error;
        }
        Value::Sequence(Arc::new(buffer))
    }

    /// `reduce(sequence, base, accumulator element -> body)`.
    ///
    /// `body` is taken to be associative. Every worker folds its slice from
    /// left to right, seeded with the slice's first element; the caller then
    /// folds `base` with the partial results in slice order. For a body that
    /// is not associative the result depends on the number of workers.
    pub(super) fn eval_reduce(&mut self,
                              sequence: &Expr,
                              base: &Expr,
                              accumulator: &Binding,
                              element: &Binding,
                              body: &Expr)
                              -> Value {
        let base = self.eval(base);
        let sequence = self.eval(sequence);
        let (Some(accumulator), Some(element)) = (accumulator.id(), element.id()) else {
            return Value::Error;
        };
        if base.is_error() {
            self.pool.recycle(sequence);
            return Value::Error;
        }
        let Value::Sequence(values) = &sequence else {
            return Value::Error;
        };

        let chunks: Vec<&[Value]> = partition(values.len(), self.workers.get())
            .into_iter()
            .map(|range| &values[range])
            .collect();
        let partials = self.fork_join(chunks, |worker, chunk| {
                               let Some((first, rest)) = chunk.split_first() else {
                                   return Value::Error;
                               };
                               rest.iter().fold(first.clone(), |acc, value| {
                                              worker.apply(accumulator,
                                                           element,
                                                           body,
                                                           acc,
                                                           value.clone())
                                          })
                           });

        let result = partials.into_iter().fold(base, |acc, partial| {
                                             self.apply(accumulator, element, body, acc, partial)
                                         });
        self.unbind(accumulator);
        self.unbind(element);
        self.pool.recycle(sequence);
        result
    }

    /// One step of a fold: `body` with `acc` and `value` bound.
    fn apply(&mut self,
             accumulator: VariableId,
             element: VariableId,
             body: &Expr,
             acc: Value,
             value: Value)
             -> Value {
        if acc.is_error() || value.is_error() {
            return Value::Error;
        }
        self.bind(accumulator, acc);
        self.bind(element, value);
        self.eval(body)
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use pretty_assertions::assert_eq;

    use crate::{
        evaluate_with,
        interpreter::{evaluator::Options, value::Value},
    };

    fn out(source: &str, workers: usize) -> Vec<Value> {
        let workers = NonZeroUsize::new(workers).unwrap();
        let evaluation = evaluate_with(source, &Options::with_workers(workers));
        assert!(evaluation.diagnostics.is_empty(), "{:?}", evaluation.messages());
        evaluation.output.into_values().collect()
    }

    fn ints(values: impl IntoIterator<Item = i64>) -> Value {
        Value::from(values.into_iter().map(Value::Int).collect::<Vec<_>>())
    }

    #[test]
    fn range_is_ordered_for_any_worker_count() {
        for workers in 1..=7 {
            assert_eq!(out("out {-3, 9}", workers), [ints(-3..=9)]);
        }
    }

    #[test]
    fn single_element_range() {
        assert_eq!(out("out {4, 4}", 3), [ints([4])]);
    }

    #[test]
    fn map_keeps_element_order() {
        for workers in 1..=5 {
            assert_eq!(out("out map({1, 10}, x -> x * x)", workers),
                       [ints((1..=10).map(|x| x * x))]);
        }
    }

    #[test]
    fn map_does_not_mutate_bound_sequence() {
        let values = out("var s = {1, 3}\nout map(s, x -> x + 1)\nout s", 2);
        assert_eq!(values, [ints([2, 3, 4]), ints([1, 2, 3])]);
    }

    #[test]
    fn nested_bulk_operators() {
        let values = out("out map({1, 3}, n -> reduce({1, n}, 0, a b -> a + b))", 2);
        assert_eq!(values, [ints([1, 3, 6])]);
    }

    #[test]
    fn reduce_of_sequences() {
        let values = out("out reduce(map({1, 3}, x -> {x, x}), {0, 0}, a b -> b)", 1);
        assert_eq!(values, [ints([3])]);
    }

    #[test]
    fn reduce_folds_base_first() {
        for workers in 1..=4 {
            assert_eq!(out("out reduce({1, 6}, 100, a b -> a + b)", workers),
                       [Value::Int(121)]);
        }
    }
}
