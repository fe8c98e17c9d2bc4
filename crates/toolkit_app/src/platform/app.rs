use std::fs;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use toolkit_client::{EngineHandle, ReqwestApi, ToolkitApi};
use toolkit_core::{
    update, AppState, FormDescriptor, FormField, FormId, Msg, ResultKind, SelectedFile,
    ZoneDescriptor, ZoneId, DEFAULT_SUBMIT_LABEL, TOOLKIT_FORM_CLASS, URL_FORM_CLASS,
};
use toolkit_logging::{toolkit_debug, toolkit_info};

use super::cli::{Cli, Command, SubmitArgs};
use super::config::{self, AppConfig};
use super::effects::EffectRunner;
use super::ui::render::TerminalSurface;

const FORM_ID: FormId = 1;
const IDLE_WAIT: Duration = Duration::from_millis(20);

pub fn run_app() -> Result<()> {
    let cli = Cli::parse();
    let mut config = config::load(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    toolkit_logging::initialize(config.log_destination(), config.log_level()?);
    toolkit_debug!("Configuration: {:?}", config);

    match cli.command {
        Command::Qr { text } => run_qr(&config, &text),
        Command::Submit(args) => {
            let mut controller = Controller::new(&config)?;
            controller.submit(&args)?;
            controller.run_until_settled()
        }
        Command::Track { task_id } => {
            let mut controller = Controller::new(&config)?;
            controller.register_form(None, false);
            controller.dispatch(Msg::TrackRequested {
                form_id: FORM_ID,
                task_id,
            });
            controller.run_until_settled()
        }
    }
}

fn run_qr(config: &AppConfig, text: &str) -> Result<()> {
    let api = ReqwestApi::new(config.client_settings())?;
    let runtime = tokio::runtime::Runtime::new().context("starting runtime")?;
    let reply = runtime.block_on(api.generate_qr(text))?;
    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}

struct Controller {
    state: AppState,
    runner: EffectRunner,
    msg_rx: mpsc::Receiver<Msg>,
    surface: TerminalSurface,
}

impl Controller {
    fn new(config: &AppConfig) -> Result<Self> {
        let engine = EngineHandle::new(config.client_settings(), config.tracker_settings())?;
        let (msg_tx, msg_rx) = mpsc::channel();
        Ok(Self {
            state: AppState::with_timings(config.timings()),
            runner: EffectRunner::new(engine, msg_tx),
            msg_rx,
            surface: TerminalSurface::default(),
        })
    }

    fn register_form(&mut self, action: Option<String>, url_form: bool) {
        let mut classes = vec![TOOLKIT_FORM_CLASS.to_string()];
        if url_form {
            classes.push(URL_FORM_CLASS.to_string());
        }
        self.dispatch(Msg::FormRegistered(FormDescriptor {
            id: FORM_ID,
            classes,
            action,
            submit_label: Some(DEFAULT_SUBMIT_LABEL.to_string()),
            has_progress: true,
            has_result: true,
            ..FormDescriptor::default()
        }));
    }

    fn submit(&mut self, args: &SubmitArgs) -> Result<()> {
        self.register_form(Some(args.action.clone()), args.url_form);

        let mut fields: Vec<FormField> = args
            .fields
            .iter()
            .map(|(name, value)| FormField::text(name.as_str(), value.as_str()))
            .collect();

        for (index, (name, path)) in args.files.iter().enumerate() {
            let zone_id = index as ZoneId + 1;
            let file = selected_file(PathBuf::from(path))?;
            self.dispatch(Msg::ZoneRegistered(ZoneDescriptor {
                id: zone_id,
                has_file_input: true,
                label_text: "Drop a file here or click to browse".to_string(),
                hint_text: String::new(),
            }));
            self.dispatch(Msg::FileInputChanged {
                zone_id,
                files: vec![file],
            });
            if let Some(selected) = self.state.selected_file(zone_id) {
                fields.push(FormField::file(name.as_str(), selected.clone()));
            }
        }

        self.dispatch(Msg::FormSubmitted {
            form_id: FORM_ID,
            fields,
        });
        Ok(())
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            self.surface.present(&state.view());
        }
        self.state = state;
        self.runner.run(effects);
    }

    /// Pumps timer and engine messages until the reply is in, no task is tracked
    /// and the form is usable again.
    fn run_until_settled(&mut self) -> Result<()> {
        while !self.state.is_settled() {
            let mut inbox = self.runner.wait_events(IDLE_WAIT);
            while let Ok(msg) = self.msg_rx.try_recv() {
                inbox.push(msg);
            }
            for msg in inbox {
                self.dispatch(msg);
            }
        }
        toolkit_info!("Form settled");

        let view = self.state.view();
        let failed = view
            .form(FORM_ID)
            .and_then(|form| form.result.as_ref())
            .filter(|result| result.visible && result.kind == Some(ResultKind::Error));
        if let Some(result) = failed {
            bail!("{}", result.message);
        }
        Ok(())
    }
}

fn selected_file(path: PathBuf) -> Result<SelectedFile> {
    let metadata =
        fs::metadata(&path).with_context(|| format!("reading file {}", path.display()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(SelectedFile {
        name,
        size: metadata.len(),
        path,
    })
}
