//! Match scripts.
//!
//! A script is a sequence of top-level forms:
//!
//! ```text
//! (define-record point x y)
//! (match '(1 2 3)
//!   ((a ... b) (list a b))
//!   (_ 'other))
//! ```
//!
//! `define-record` registers a native record type for `$`/`@` patterns.
//! A `match` subject must be a quoted datum or a self-evaluating literal.
//! Clause bodies are not evaluated as Scheme: each body form is
//! instantiated by replacing pattern variables with their values, and a
//! list whose head names a procedure bound by the pattern (`get!`/`set!`)
//! is a call. The value of the last body form is the result.

use knot_ir::{Name, Value};
use knot_match::{match_value, Bindings, Clause, CompiledPattern, Failure, MatchError, MatchOptions};
use knot_patterns::{parse_match_form, ClauseForm, Keywords, MatchForm, PatternSyntaxError, Registry};
use knot_reader::{read_all, ReadError};

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Syntax(#[from] PatternSyntaxError),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error("unsupported top-level form {form}")]
    UnknownForm { form: Value },

    #[error("malformed define-record form {form}, expected (define-record tag field ...)")]
    BadRecordDefinition { form: Value },

    #[error("cannot evaluate {form}: a match subject must be quoted data or a literal")]
    BadSubject { form: Value },
}

/// What [`Session::check`] compiled.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckSummary {
    pub records: usize,
    pub matches: usize,
    pub clauses: usize,
}

/// Script state: the registry grows as `define-record` forms run.
pub struct Session {
    registry: Registry,
    options: MatchOptions,
    define_record: Name,
}

impl Session {
    pub fn new(options: MatchOptions) -> Self {
        Session {
            registry: Registry::with_builtins(),
            options,
            define_record: Name::intern("define-record"),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Run every form, passing each `match` result to `emit` as it is
    /// produced. Stops at the first error.
    #[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len()))]
    pub fn run_with(
        &mut self,
        source: &str,
        mut emit: impl FnMut(Value),
    ) -> Result<(), ScriptError> {
        for form in read_all(source)? {
            if self.try_define_record(&form)? {
                continue;
            }
            let match_form = self.match_form(&form)?;
            emit(self.run_match(&match_form)?);
        }
        Ok(())
    }

    /// [`run_with`](Self::run_with), collecting the results.
    pub fn run(&mut self, source: &str) -> Result<Vec<Value>, ScriptError> {
        let mut results = Vec::new();
        self.run_with(source, |value| results.push(value))?;
        Ok(results)
    }

    /// Parse and compile every clause without matching anything.
    #[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len()))]
    pub fn check(&mut self, source: &str) -> Result<CheckSummary, ScriptError> {
        let mut summary = CheckSummary::default();
        for form in read_all(source)? {
            if self.try_define_record(&form)? {
                summary.records += 1;
                continue;
            }
            let match_form = self.match_form(&form)?;
            for clause in &match_form.clauses {
                CompiledPattern::compile(&clause.pattern, &self.options)?;
            }
            summary.matches += 1;
            summary.clauses += match_form.clauses.len();
        }
        Ok(summary)
    }

    /// Register `(define-record tag field ...)`. Returns false for any
    /// other form.
    fn try_define_record(&mut self, form: &Value) -> Result<bool, ScriptError> {
        let head = form.as_pair().and_then(|pair| pair.car().as_symbol());
        if head != Some(self.define_record) {
            return Ok(false);
        }
        let bad = || ScriptError::BadRecordDefinition { form: form.clone() };
        let items = form.to_vec().ok_or_else(bad)?;
        let Some((tag, fields)) = items[1..].split_first() else {
            return Err(bad());
        };
        let tag = tag.as_symbol().ok_or_else(bad)?;
        let fields = fields
            .iter()
            .map(|field| field.as_symbol().ok_or_else(bad))
            .collect::<Result<Vec<_>, _>>()?;
        self.registry.define_native_record(tag, &fields);
        Ok(true)
    }

    fn match_form(&self, form: &Value) -> Result<MatchForm, ScriptError> {
        let head = form.as_pair().and_then(|pair| pair.car().as_symbol());
        if head != Some(Keywords::get().match_) {
            return Err(ScriptError::UnknownForm { form: form.clone() });
        }
        Ok(parse_match_form(form, &self.registry)?)
    }

    fn run_match(&self, form: &MatchForm) -> Result<Value, ScriptError> {
        let subject = evaluate_subject(&form.subject)?;
        let clauses = form
            .clauses
            .iter()
            .map(|clause| self.compile_clause(clause))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(match_value(&subject, &clauses)?)
    }

    fn compile_clause<'f>(&self, clause: &'f ClauseForm) -> Result<Clause<'f, Value>, ScriptError> {
        let pattern = CompiledPattern::compile(&clause.pattern, &self.options)?;
        let compiled = Clause::new(pattern, move |bindings: &Bindings, failure: &Failure| {
            run_body(clause, bindings, failure)
        });
        Ok(match clause.failure {
            Some(name) => compiled.with_failure(name),
            None => compiled,
        })
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(MatchOptions::default())
    }
}

/// Quoted data and self-evaluating literals; nothing else is evaluated.
fn evaluate_subject(form: &Value) -> Result<Value, ScriptError> {
    match form {
        Value::Symbol(_) => Err(ScriptError::BadSubject { form: form.clone() }),
        Value::Pair(pair) => {
            let quoted = pair.car().as_symbol() == Some(Keywords::get().quote);
            match form.to_vec().as_deref() {
                Some([_, datum]) if quoted => Ok(datum.clone()),
                _ => Err(ScriptError::BadSubject { form: form.clone() }),
            }
        }
        _ => Ok(form.clone()),
    }
}

fn run_body(clause: &ClauseForm, bindings: &Bindings, failure: &Failure) -> Result<Value, MatchError> {
    let mut result = Value::Unspecified;
    for form in &clause.body {
        if clause.failure.is_some() && invokes_failure(form, clause.failure) {
            return failure.invoke();
        }
        result = instantiate(form, bindings)?;
    }
    Ok(result)
}

/// `id` or `(id)` where `id` names the clause's failure continuation.
fn invokes_failure(form: &Value, failure: Option<Name>) -> bool {
    match form {
        Value::Symbol(name) => Some(*name) == failure,
        Value::Pair(pair) => pair.cdr().is_null() && pair.car().as_symbol() == failure,
        _ => false,
    }
}

/// Replace bound symbols by their values. `(quote d)` stays `d`; a list
/// headed by a symbol bound to a procedure is a call.
fn instantiate(form: &Value, bindings: &Bindings) -> Result<Value, MatchError> {
    match form {
        Value::Symbol(name) => Ok(bindings.get(*name).cloned().unwrap_or_else(|| form.clone())),
        Value::Pair(pair) => {
            let head = pair.car();
            if head.as_symbol() == Some(Keywords::get().quote) {
                if let Some([_, datum]) = form.to_vec().as_deref() {
                    return Ok(datum.clone());
                }
            }
            let callee = head
                .as_symbol()
                .and_then(|name| bindings.get(name))
                .and_then(Value::as_procedure)
                .cloned();
            if let Some(procedure) = callee {
                let args = pair.cdr().to_vec().unwrap_or_default();
                let args = args
                    .iter()
                    .map(|arg| instantiate(arg, bindings))
                    .collect::<Result<Vec<_>, _>>()?;
                return Ok(procedure.call(&args)?);
            }
            Ok(Value::cons(
                instantiate(&head, bindings)?,
                instantiate(&pair.cdr(), bindings)?,
            ))
        }
        Value::Vector(vector) => {
            let items = vector
                .to_vec()
                .iter()
                .map(|item| instantiate(item, bindings))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::vector(items))
        }
        _ => Ok(form.clone()),
    }
}
