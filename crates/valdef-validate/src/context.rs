use std::fmt::Display;

use tracing::debug;
use valdef_definition::DefinitionError;
use valdef_value::{Accessor, ContainerId, Value};

use crate::config::ValidateOptions;
use crate::error::{Result, ValidateError, Violation};

/// Definitions interpreted at one path, one inside the other, before the
/// nesting is taken for left recursion.
pub(crate) const MAX_NESTING_AT_PATH: usize = 64;

/// Per-call validation state.
///
/// Owns the collected violations, the current path (root prefix first) and
/// the identities of the containers being descended into. One context
/// serves one top-level call; `either` trials run on forks.
pub(crate) struct Context<'a> {
    options: &'a ValidateOptions,
    path: Vec<String>,
    ancestors: Vec<ContainerId>,
    /// `(copy, original)` identities of containers copied for a trial.
    origins: Vec<(ContainerId, ContainerId)>,
    /// Path depth of every definition being interpreted, outermost first.
    visits: Vec<usize>,
    errors: Vec<Violation>,
    assert: bool,
}

impl<'a> Context<'a> {
    pub(crate) fn new(options: &'a ValidateOptions) -> Self {
        Self {
            options,
            path: vec![options.prefix.clone()],
            ancestors: Vec::new(),
            origins: Vec::new(),
            visits: Vec::new(),
            errors: Vec::new(),
            assert: options.assert,
        }
    }

    /// A trial context at the same position with no errors of its own.
    /// Trials never assert: their failures are data for the caller.
    pub(crate) fn fork(&self) -> Context<'a> {
        Context {
            options: self.options,
            path: self.path.clone(),
            ancestors: self.ancestors.clone(),
            origins: self.origins.clone(),
            visits: self.visits.clone(),
            errors: Vec::new(),
            assert: false,
        }
    }

    /// Treat each copied container as the original it was copied from, so
    /// the cycle guard sees through trial copies.
    pub(crate) fn adopt_copies(&mut self, copies: &[(Value, ContainerId)]) {
        for (copy, original) in copies {
            if let Some(id) = copy.container_id() {
                let original = self.origin_of(*original);
                self.origins.push((id, original));
            }
        }
    }

    fn origin_of(&self, id: ContainerId) -> ContainerId {
        self.origins
            .iter()
            .find(|(copy, _)| *copy == id)
            .map_or(id, |(_, original)| *original)
    }

    pub(crate) fn options(&self) -> &'a ValidateOptions {
        self.options
    }

    pub(crate) fn current_path(&self) -> String {
        self.path.concat()
    }

    /// True while no accessor has been pushed.
    pub(crate) fn at_root(&self) -> bool {
        self.path.len() == 1
    }

    #[cfg(test)]
    pub(crate) fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub(crate) fn into_errors(self) -> Vec<Violation> {
        self.errors
    }

    /// Report a violation at the current path: `"{path} {text}"`.
    pub(crate) fn report(&mut self, text: impl Display) -> Result<()> {
        let path = self.current_path();
        let message = format!("{path} {text}");
        self.push(Violation::new(path, message))
    }

    /// Report a violation about child `accessor` of the current value,
    /// without descending into it.
    pub(crate) fn report_child(&mut self, accessor: &Accessor, text: impl Display) -> Result<()> {
        let path = format!("{}{accessor}", self.current_path());
        let message = format!("{path} {text}");
        self.push(Violation::new(path, message))
    }

    pub(crate) fn push(&mut self, violation: Violation) -> Result<()> {
        if self.assert {
            return Err(ValidateError::Assertion(violation));
        }
        self.errors.push(violation);
        Ok(())
    }

    /// Run `f` with `accessor` appended to the path. The token is popped
    /// again whatever `f` returns.
    pub(crate) fn scoped<T>(
        &mut self,
        accessor: &Accessor,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.path.push(accessor.token());
        let result = f(self);
        self.path.pop();
        result
    }

    /// Run `f` with container `id` marked active. A container that is
    /// already active is a reference cycle: it is reported and `f` is not
    /// run. Returns whether `f` ran.
    pub(crate) fn descend(
        &mut self,
        id: ContainerId,
        f: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<bool> {
        let id = self.origin_of(id);
        if self.ancestors.contains(&id) {
            debug!(path = %self.current_path(), "reference cycle detected");
            self.report("contains a reference cycle")?;
            return Ok(false);
        }
        self.ancestors.push(id);
        let result = f(self);
        self.ancestors.pop();
        result.map(|()| true)
    }

    /// Run `f` to interpret one definition at the current path. Fails once
    /// more than [`MAX_NESTING_AT_PATH`] definitions nest at this path.
    pub(crate) fn visit<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let depth = self.path.len();
        let nested = self.visits.iter().rev().take_while(|&&d| d == depth).count();
        if nested >= MAX_NESTING_AT_PATH {
            return Err(DefinitionError::LeftRecursion {
                path: self.current_path(),
            }
            .into());
        }
        self.visits.push(depth);
        let result = f(self);
        self.visits.pop();
        result
    }
}

#[cfg(test)]
mod tests {
    use valdef_value::Object;

    use super::*;

    #[test]
    fn paths_concatenate_tokens() {
        let options = ValidateOptions::default();
        let mut ctx = Context::new(&options);

        ctx.scoped(&Accessor::from("body"), |ctx| {
            ctx.scoped(&Accessor::from(1), |ctx| {
                assert_eq!(ctx.current_path(), "value.body[1]");
                ctx.report("is required")
            })
        })
        .unwrap();

        assert!(ctx.at_root());
        assert_eq!(ctx.into_errors()[0].message, "value.body[1] is required");
    }

    #[test]
    fn path_is_popped_when_the_scope_fails() {
        let options = ValidateOptions::default().with_assert(true);
        let mut ctx = Context::new(&options);

        let result = ctx.scoped(&Accessor::from("a"), |ctx| ctx.report("is not string"));

        assert!(matches!(result, Err(ValidateError::Assertion(v)) if v.path == "value.a"));
        assert_eq!(ctx.current_path(), "value");
    }

    #[test]
    fn forks_start_empty_and_never_assert() {
        let options = ValidateOptions::default().with_assert(true);
        let ctx = Context::new(&options);
        let mut trial = ctx.fork();

        trial.report("is not number").unwrap();
        assert_eq!(trial.error_count(), 1);
        assert_eq!(ctx.error_count(), 0);
    }

    #[test]
    fn copies_count_as_their_originals() {
        let options = ValidateOptions::default();
        let mut ctx = Context::new(&options);
        let original = Value::from(Object::new());
        let (copy, copies) = original.deep_clone_with_origins();

        ctx.descend(original.container_id().unwrap(), |ctx| {
            let mut trial = ctx.fork();
            trial.adopt_copies(&copies);
            let ran = trial.descend(copy.container_id().unwrap(), |_| Ok(()))?;
            assert!(!ran);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn nesting_at_one_path_is_bounded() {
        fn nest(ctx: &mut Context<'_>, remaining: usize) -> Result<()> {
            if remaining == 0 {
                return Ok(());
            }
            ctx.visit(|ctx| nest(ctx, remaining - 1))
        }

        let options = ValidateOptions::default();
        let mut ctx = Context::new(&options);
        assert!(nest(&mut ctx, MAX_NESTING_AT_PATH).is_ok());
        assert!(matches!(
            nest(&mut ctx, MAX_NESTING_AT_PATH + 1),
            Err(ValidateError::Definition(DefinitionError::LeftRecursion { .. }))
        ));

        let deeper = ctx.visit(|ctx| {
            ctx.scoped(&Accessor::from("a"), |ctx| nest(ctx, MAX_NESTING_AT_PATH))
        });
        assert!(deeper.is_ok());
    }

    #[test]
    fn active_containers_are_cycles() {
        let options = ValidateOptions::default();
        let mut ctx = Context::new(&options);
        let object = Object::new();

        let ran = ctx
            .descend(object.id(), |ctx| {
                let nested = ctx.descend(object.id(), |_| Ok(()))?;
                assert!(!nested);
                Ok(())
            })
            .unwrap();

        assert!(ran);
        assert_eq!(
            ctx.into_errors()[0].message,
            "value contains a reference cycle"
        );
    }
}
