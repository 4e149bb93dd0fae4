use crate::interpreter::{evaluator::core::Context, value::core::Variant};

/// Receives each line produced by `PRINT`.
pub type PrintHook = Box<dyn FnMut(&str)>;
/// Receives the message of every runtime error that ends a run.
pub type ErrorHook = Box<dyn FnMut(&str)>;
/// Receives the text of each `REM` statement.
pub type LogHook = Box<dyn FnMut(&str)>;
/// Receives each `COMMAND` with its evaluated arguments.
pub type CommandHook = Box<dyn FnMut(&str, &[Variant])>;

/// Callbacks through which a script talks to its host.
pub struct HostHooks {
    pub(crate) print:   PrintHook,
    pub(crate) error:   ErrorHook,
    pub(crate) log:     LogHook,
    pub(crate) command: CommandHook,
}

impl Default for HostHooks {
    fn default() -> Self {
        Self { print:   Box::new(|line: &str| println!("{line}")),
               error:   Box::new(|message: &str| eprintln!("{message}")),
               log:     Box::new(|text: &str| tracing::info!(target: "hostbasic::rem", "{text}")),
               command: Box::new(|name: &str, arguments: &[Variant]| {
                   tracing::warn!(name, arguments = arguments.len(), "unhandled command");
               }), }
    }
}

impl Context {
    /// Installs the hook receiving `PRINT` output.
    ///
    /// # Example
    /// ```
    /// use std::{cell::RefCell, rc::Rc};
    ///
    /// use hostbasic::{Context, run};
    ///
    /// let out = Rc::new(RefCell::new(Vec::new()));
    /// let sink = Rc::clone(&out);
    ///
    /// let mut ctx = Context::new();
    /// ctx.on_print(move |line| sink.borrow_mut().push(line.to_string()));
    /// run("PRINT 1 + 2, \"apples\"", &mut ctx).unwrap();
    ///
    /// assert_eq!(*out.borrow(), vec!["3 apples".to_string()]);
    /// ```
    pub fn on_print(&mut self, hook: impl FnMut(&str) + 'static) -> &mut Self {
        self.hooks.print = Box::new(hook);
        self
    }

    /// Installs the hook receiving runtime error messages.
    pub fn on_error(&mut self, hook: impl FnMut(&str) + 'static) -> &mut Self {
        self.hooks.error = Box::new(hook);
        self
    }

    /// Installs the hook receiving `REM` text.
    pub fn on_log(&mut self, hook: impl FnMut(&str) + 'static) -> &mut Self {
        self.hooks.log = Box::new(hook);
        self
    }

    /// Installs the hook receiving `COMMAND` statements.
    pub fn on_command(&mut self, hook: impl FnMut(&str, &[Variant]) + 'static) -> &mut Self {
        self.hooks.command = Box::new(hook);
        self
    }
}
