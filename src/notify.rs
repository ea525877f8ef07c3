/// Where the command executor reports what happened.
pub trait Notifier: Send {
    fn notify(&mut self, msg: &str);
}

/// Prints every message on its own line to stdout.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, msg: &str) {
        println!("{}", msg);
    }
}

/// Keeps messages around so they can be inspected later.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Vec<String>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, msg: &str) {
        self.messages.push(msg.to_owned());
    }
}
