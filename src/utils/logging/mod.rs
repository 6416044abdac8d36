mod console_logger;

pub(crate) use console_logger::StageLogger;
