//! The rule abstraction.

/// Scores an item of type `T` under a context `C`.
///
/// Lower scores rank first, matching the cost convention of the solvers.
///
/// # Examples
///
/// ```
/// use u_dayplan::dispatching::PriorityRule;
///
/// struct Shortest;
///
/// impl PriorityRule<(i64, i64), ()> for Shortest {
///     fn name(&self) -> &str { "Shortest" }
///     fn score(&self, window: &(i64, i64), _ctx: &()) -> f64 {
///         (window.1 - window.0) as f64
///     }
/// }
///
/// assert_eq!(Shortest.score(&(3, 10), &()), 7.0);
/// ```
pub trait PriorityRule<T, C>: Send + Sync {
    fn name(&self) -> &str;

    fn score(&self, item: &T, context: &C) -> f64;
}
