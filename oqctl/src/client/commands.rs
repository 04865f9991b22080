//! Runs one device command and renders the result
// (c) 2026 oqctl developers

use std::io::Write;

use anyhow::{Context as _, Result};
use bytes::Bytes;
use human_repr::HumanCount as _;
use indicatif::ProgressBar;
use tracing::{info, warn};

use super::progress::SpinnerRetry;
use crate::{
    Controller,
    cli::DeviceCommand,
    cli::styles::{success, warning},
    protocol::{CommandOutcome, Verb, upload_name},
    session::{SizeExceeded, UploadOutcome, UploadPlan, safe_budget},
};

/// Decides whether to go ahead with an upload the device may not have room for
pub(crate) type Confirm<'a> = &'a dyn Fn(&SizeExceeded) -> Result<bool>;

/// Everything a command needs besides the controller
pub(crate) struct Frontend<'a, W: Write> {
    pub(crate) out: W,
    pub(crate) spinner: ProgressBar,
    /// Unconfirmed replies are failures
    pub(crate) strict: bool,
    pub(crate) confirm: Confirm<'a>,
}

impl<W: Write> Frontend<'_, W> {
    fn emit(&mut self, line: &str) -> Result<()> {
        let out = &mut self.out;
        self.spinner.suspend(|| writeln!(out, "{line}"))?;
        Ok(())
    }

    fn check(&self, outcome: CommandOutcome, verb: Verb) -> Result<String> {
        if self.strict {
            Ok(outcome.into_strict_result(verb)?)
        } else {
            if let CommandOutcome::AmbiguousNonEmpty(raw) = &outcome {
                warn!("{verb}: device did not confirm success ({raw:?})");
            }
            Ok(outcome.into_result(verb)?)
        }
    }

    async fn show_listing(&mut self, controller: &Controller) -> Result<()> {
        self.spinner.set_message("Listing payloads");
        let names = controller
            .list_payloads()
            .await
            .context("listing payloads")?;
        if names.is_empty() {
            info!("no payloads on device");
        }
        for name in names {
            self.emit(&name)?;
        }
        Ok(())
    }

    /// Runs a command against a connected controller.
    ///
    /// # Return
    /// `true` if the command did what was asked. `false` if the user declined to go ahead.
    pub(crate) async fn dispatch(
        &mut self,
        controller: &Controller,
        command: DeviceCommand,
    ) -> Result<bool> {
        match command {
            DeviceCommand::Connect => {
                let session = controller.session().context("no session")?;
                let sep = match session.separator() {
                    "" => "(none)".to_string(),
                    s => format!("{s:?}"),
                };
                self.emit(&format!("Connected to {session}, separator {sep}"))?;
            }
            DeviceCommand::Ls => self.show_listing(controller).await?,
            DeviceCommand::Run { name } => {
                self.spinner.set_message(format!("Running {name}"));
                let reply = self.check(controller.run(&name).await?, Verb::Run)?;
                let style = success();
                self.emit(&format!("{style}{name}:{style:#} {}", reply.trim_end()))?;
            }
            DeviceCommand::Cat { name } => {
                self.spinner.set_message(format!("Reading {name}"));
                let content = controller.read(&name).await?.into_result(Verb::Read)?;
                let out = &mut self.out;
                self.spinner.suspend(|| out.write_all(content.as_bytes()))?;
            }
            DeviceCommand::Get { name, dest } => {
                self.spinner.set_message(format!("Reading {name}"));
                let content = controller.read(&name).await?.into_result(Verb::Read)?;
                let dest = dest.unwrap_or_else(|| upload_name(&name).to_string());
                std::fs::write(&dest, content.as_bytes())
                    .with_context(|| format!("writing {dest}"))?;
                self.emit(&format!(
                    "Saved {name} to {dest} ({})",
                    content.len().human_count_bytes()
                ))?;
            }
            DeviceCommand::Rm { name } => {
                self.spinner.set_message(format!("Deleting {name}"));
                let _ = self.check(controller.delete(&name).await?, Verb::Delete)?;
                let style = success();
                self.emit(&format!("{style}Deleted{style:#} {name}"))?;
                self.show_listing(controller).await?;
            }
            DeviceCommand::Put { file, force } => {
                let content = std::fs::read(&file).with_context(|| format!("reading {file}"))?;
                let name = upload_name(&file).to_string();
                if !self.put(controller, &name, content.into(), force).await? {
                    return Ok(false);
                }
                self.show_listing(controller).await?;
            }
            DeviceCommand::Mem => {
                self.spinner.set_message("Querying free memory");
                let free = controller.free_memory().await?;
                self.emit(&format!(
                    "Free memory {}; largest safe upload {}",
                    free.human_count_bytes(),
                    safe_budget(free).human_count_bytes()
                ))?;
            }
        }
        Ok(true)
    }

    async fn put(
        &mut self,
        controller: &Controller,
        name: &str,
        content: Bytes,
        force: bool,
    ) -> Result<bool> {
        let observer = SpinnerRetry(self.spinner.clone());
        self.spinner.set_message(format!("Uploading {name}"));
        let outcome = if force {
            controller
                .retry_upload(UploadPlan::new(name, content), Some(&observer))
                .await?
        } else {
            controller.upload(name, content, Some(&observer)).await?
        };

        let outcome = match outcome {
            UploadOutcome::SizeExceeded { decision, plan } => {
                let confirm = self.confirm;
                if !self.spinner.suspend(|| confirm(&decision))? {
                    let style = warning();
                    self.emit(&format!(
                        "{style}Not uploaded:{style:#} {decision} (use --force to override)"
                    ))?;
                    return Ok(false);
                }
                controller.retry_upload(plan, Some(&observer)).await?
            }
            completed @ UploadOutcome::Completed(_) => completed,
        };
        self.spinner.set_prefix("");

        let UploadOutcome::Completed(receipt) = outcome else {
            anyhow::bail!("upload of a forced plan was refused");
        };
        let _ = self.check(receipt.outcome, Verb::Write)?;
        let style = success();
        self.emit(&format!(
            "{style}Uploaded{style:#} {} ({})",
            receipt.filename,
            receipt.size.human_count_bytes()
        ))?;
        Ok(true)
    }
}

/// Asks on the terminal whether to upload anyway; declines if nobody is there to ask.
pub(crate) fn confirm_on_terminal(decision: &SizeExceeded) -> Result<bool> {
    if !console::user_attended_stderr() {
        warn!("{decision}; not interactive, so not uploading");
        return Ok(false);
    }
    let term = console::Term::stderr();
    let style = warning();
    term.write_str(&format!(
        "{style}Warning:{style:#} {decision}. The device may run out of memory. Upload anyway? [y/N] "
    ))?;
    let answer = term.read_line()?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "YES" | "Yes"))
}

#[cfg(test)]
mod test {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use anyhow::Result;
    use assertables::assert_contains;
    use indicatif::ProgressBar;
    use pretty_assertions::assert_eq;

    use super::Frontend;
    use crate::Controller;
    use crate::cli::DeviceCommand;
    use crate::session::{DeviceAddress, SizeExceeded, UploadPolicy};
    use crate::transport::MockTransport;

    fn plain(out: Vec<u8>) -> String {
        console::strip_ansi_codes(&String::from_utf8(out).unwrap()).to_string()
    }

    fn never(_: &SizeExceeded) -> Result<bool> {
        panic!("should not be asked")
    }

    /// A mock device on port 80, separator `|`, which answers the given bodies in any order
    fn mock_device(replies: &'static [(&'static str, &'static str)]) -> MockTransport {
        let mut mock = MockTransport::new();
        let _ = mock.expect_probe().returning(|_| Ok(()));
        let _ = mock
            .expect_post()
            .withf(|_, b| &b[..] == b"SEP")
            .returning(|_, _| Ok("|".into()));
        for &(body, reply) in replies {
            let _ = mock
                .expect_post()
                .withf(move |_, b| &b[..] == body.as_bytes())
                .returning(move |_, _| Ok(reply.into()));
        }
        mock
    }

    async fn connected(mock: MockTransport) -> Controller {
        let address = DeviceAddress {
            host: "10.10.5.1".into(),
            ports: vec![80],
            path: "/c2".into(),
        };
        let mut c = Controller::new(Arc::new(mock), address, UploadPolicy::default());
        let _ = c.connect().await.unwrap();
        c
    }

    fn frontend(strict: bool, confirm: super::Confirm<'_>) -> Frontend<'_, Vec<u8>> {
        Frontend {
            out: Vec::new(),
            spinner: ProgressBar::hidden(),
            strict,
            confirm,
        }
    }

    async fn run(
        mock: MockTransport,
        command: DeviceCommand,
        strict: bool,
    ) -> (Result<bool>, String) {
        let c = connected(mock).await;
        let mut fe = frontend(strict, &never);
        let result = fe.dispatch(&c, command).await;
        (result, plain(fe.out))
    }

    #[tokio::test]
    async fn connect_reports_session() {
        let (result, out) = run(mock_device(&[]), DeviceCommand::Connect, false).await;
        assert!(result.unwrap());
        assert_eq!(out, "Connected to http://10.10.5.1:80/c2, separator \"|\"\n");
    }

    #[tokio::test]
    async fn list() {
        let (result, out) = run(
            mock_device(&[("LS", "a.oqs\n#x\nb.oqs\nc.txt")]),
            DeviceCommand::Ls,
            false,
        )
        .await;
        assert!(result.unwrap());
        assert_eq!(out, "a.oqs\nb.oqs\n");
    }

    #[tokio::test]
    async fn run_permissive_and_strict() {
        let cmd = || DeviceCommand::Run {
            name: "a.oqs".into(),
        };
        let (result, out) = run(mock_device(&[("RUN|a.oqs", "hmm")]), cmd(), false).await;
        assert!(result.unwrap());
        assert_contains!(out, "hmm");

        let (result, _) = run(mock_device(&[("RUN|a.oqs", "hmm")]), cmd(), true).await;
        assert_contains!(result.unwrap_err().to_string(), "ambiguous");

        let (result, _) = run(mock_device(&[("RUN|a.oqs", "")]), cmd(), false).await;
        assert_contains!(result.unwrap_err().to_string(), "empty reply");
    }

    #[tokio::test]
    async fn cat_writes_content() {
        let (result, out) = run(
            mock_device(&[("READ|a.oqs", "STRING hi\nENTER\n")]),
            DeviceCommand::Cat {
                name: "a.oqs".into(),
            },
            false,
        )
        .await;
        assert!(result.unwrap());
        assert_eq!(out, "STRING hi\nENTER\n");
    }

    #[tokio::test]
    async fn get_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("copy.oqs");
        let (result, out) = run(
            mock_device(&[("READ|a.oqs", "DELAY 100")]),
            DeviceCommand::Get {
                name: "a.oqs".into(),
                dest: Some(dest.to_string_lossy().to_string()),
            },
            false,
        )
        .await;
        assert!(result.unwrap());
        assert_contains!(out, "Saved a.oqs");
        assert_eq!(std::fs::read_to_string(dest).unwrap(), "DELAY 100");
    }

    #[tokio::test]
    async fn rm_refreshes_listing() {
        let (result, out) = run(
            mock_device(&[("DELETE|a.oqs", "File deleted"), ("LS", "b.oqs")]),
            DeviceCommand::Rm {
                name: "a.oqs".into(),
            },
            false,
        )
        .await;
        assert!(result.unwrap());
        assert_contains!(out, "a.oqs");
        assert!(out.ends_with("b.oqs\n"), "{out}");
    }

    #[tokio::test]
    async fn mem() {
        let (result, out) = run(
            mock_device(&[("FREE_MEM", "100000")]),
            DeviceCommand::Mem,
            false,
        )
        .await;
        assert!(result.unwrap());
        assert_contains!(out, "75");
    }

    fn payload_file(dir: &tempfile::TempDir, name: &str, size: usize) -> String {
        let path = dir.path().join(name);
        std::fs::write(&path, vec![b'x'; size]).unwrap();
        path.to_string_lossy().to_string()
    }

    #[tokio::test]
    async fn put_fits() {
        let dir = tempfile::tempdir().unwrap();
        let file = payload_file(&dir, ".hello.oqs", 10);
        let mut mock = mock_device(&[("FREE_MEM", "1000"), ("LS", "hello.oqs")]);
        let _ = mock
            .expect_post()
            .withf(|_, b| b.starts_with(b"WRITE|hello.oqs|\n"))
            .times(1)
            .returning(|_, _| Ok("File uploaded".into()));
        let (result, out) = run(mock, DeviceCommand::Put { file, force: false }, false).await;
        assert!(result.unwrap());
        assert_contains!(out, "Uploaded hello.oqs");
    }

    #[tokio::test]
    async fn put_too_big_declined() {
        let dir = tempfile::tempdir().unwrap();
        let file = payload_file(&dir, "big.oqs", 800);
        let mut mock = mock_device(&[("FREE_MEM", "1000")]);
        let _ = mock
            .expect_post()
            .withf(|_, b| b.starts_with(b"WRITE"))
            .never();
        let c = connected(mock).await;
        let asked = AtomicBool::new(false);
        let decline = |d: &SizeExceeded| -> Result<bool> {
            assert_eq!(*d, SizeExceeded { size: 800, budget: 750 });
            asked.store(true, Ordering::Relaxed);
            Ok(false)
        };
        let mut fe = frontend(false, &decline);
        let result = fe
            .dispatch(&c, DeviceCommand::Put { file, force: false })
            .await;
        assert!(!result.unwrap());
        assert!(asked.load(Ordering::Relaxed));
        assert_contains!(plain(fe.out), "Not uploaded");
    }

    #[tokio::test]
    async fn put_too_big_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let file = payload_file(&dir, "big.oqs", 800);
        let mut mock = mock_device(&[("FREE_MEM", "1000"), ("LS", "big.oqs")]);
        let _ = mock
            .expect_post()
            .withf(|_, b| b.starts_with(b"WRITE|big.oqs"))
            .times(1)
            .returning(|_, _| Ok("written".into()));
        let c = connected(mock).await;
        let accept = |_: &SizeExceeded| -> Result<bool> { Ok(true) };
        let mut fe = frontend(false, &accept);
        let result = fe
            .dispatch(&c, DeviceCommand::Put { file, force: false })
            .await;
        assert!(result.unwrap());
    }

    #[tokio::test]
    async fn put_forced_skips_memory_check() {
        let dir = tempfile::tempdir().unwrap();
        let file = payload_file(&dir, "big.oqs", 800);
        let mut mock = mock_device(&[("LS", "big.oqs")]);
        let _ = mock
            .expect_post()
            .withf(|_, b| &b[..] == b"FREE_MEM")
            .never();
        let _ = mock
            .expect_post()
            .withf(|_, b| b.starts_with(b"WRITE|big.oqs"))
            .times(1)
            .returning(|_, _| Ok("written".into()));
        let (result, _) = run(mock, DeviceCommand::Put { file, force: true }, false).await;
        assert!(result.unwrap());
    }

    #[tokio::test]
    async fn put_wrong_type() {
        let dir = tempfile::tempdir().unwrap();
        let file = payload_file(&dir, "notes.txt", 8);
        let (result, _) = run(
            mock_device(&[]),
            DeviceCommand::Put { file, force: false },
            false,
        )
        .await;
        assert_contains!(result.unwrap_err().to_string(), "not a .oqs payload");
    }
}
