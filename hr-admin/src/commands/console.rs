//! Line-driven roster screen
//!
//! One command per line. While the form dialog is open, lines edit the
//! form; while a deletion prompt is open, only `si` / `no` are accepted.
//! The loop ends on `salir`, end of input, or when the session expires.

use super::employees::is_yes;
use super::require_employees_screen;
use crate::app::AppContext;
use crate::core::Notification;
use crate::employees::schema::FieldKey;
use crate::employees::{EmployeesPage, SubmitOutcome};
use crate::export::ExportFormat;
use crate::view;
use shared::error::ErrorCode;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::watch;

const HELP: &str = "\
Comandos:
  listar | refrescar          recargar la página actual
  buscar [texto]              filtrar (vacío quita el filtro)
  activos si|no               solo empleados activos
  pagina <n> | sig | ant      paginación
  tamano <n>                  filas por página
  ver <id>                    detalle de un empleado
  nuevo | editar <id>         abrir el formulario
  eliminar <id>               eliminar (pide confirmación)
  ficha <id>                  descargar la ficha
  exportar xlsx|pdf|csv       exportar la página actual
  salir

En el formulario:
  <campo>=<valor>             asignar un campo
  campos | errores            ver el formulario / los errores
  guardar | cancelar";

enum Flow {
    Continue,
    Quit,
}

struct Console<'a, W: Write> {
    page: EmployeesPage,
    out: &'a mut W,
    notices: watch::Receiver<Option<Notification>>,
}

pub async fn run<R, W>(ctx: &AppContext, input: R, out: &mut W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    require_employees_screen(ctx)?;
    let mut notices = ctx.notifier.subscribe();
    notices.borrow_and_update();

    let mut console = Console {
        page: ctx.employees_page(),
        out,
        notices,
    };
    writeln!(console.out, "GV-RH · Empleados (escribe 'ayuda')")?;
    let state = console.page.mount().await;
    console.show_list(&state)?;
    console.flush_notice()?;

    let mut lines = input.lines();
    while ctx.session.is_authenticated() {
        let Some(line) = lines.next_line().await? else {
            return Ok(());
        };
        let flow = console.handle(line.trim()).await?;
        console.flush_notice()?;
        if matches!(flow, Flow::Quit) {
            return Ok(());
        }
    }
    writeln!(console.out, "{}", ErrorCode::SessionExpired.message())?;
    Ok(())
}

impl<W: Write> Console<'_, W> {
    fn flush_notice(&mut self) -> anyhow::Result<()> {
        if self.notices.has_changed().unwrap_or(false) {
            let notice = self.notices.borrow_and_update().clone();
            if let Some(notice) = notice {
                writeln!(self.out, "{}", view::render_notification(&notice))?;
            }
        }
        Ok(())
    }

    fn show_list(&mut self, state: &crate::employees::ListState) -> anyhow::Result<()> {
        writeln!(self.out, "{}", view::render_list_state(state))?;
        Ok(())
    }

    async fn handle(&mut self, line: &str) -> anyhow::Result<Flow> {
        if line.is_empty() {
            return Ok(Flow::Continue);
        }
        if self.page.pending_delete().is_some() {
            self.answer_delete(line).await?;
            return Ok(Flow::Continue);
        }
        if self.page.form().is_some() {
            return self.handle_form(line).await;
        }

        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((c, a)) => (c, a.trim()),
            None => (line, ""),
        };
        match command {
            "salir" => return Ok(Flow::Quit),
            "ayuda" => writeln!(self.out, "{}", HELP)?,
            "listar" | "refrescar" => {
                let state = self.page.refresh().await;
                self.show_list(&state)?;
            }
            "buscar" => {
                let state = self.page.search(arg).await;
                self.show_list(&state)?;
            }
            "activos" => {
                let state = self.page.set_active_only(is_yes(arg)).await;
                self.show_list(&state)?;
            }
            "pagina" => match arg.parse::<u32>() {
                Ok(n) if n >= 1 => {
                    let state = self.page.go_to_page(n - 1).await;
                    self.show_list(&state)?;
                }
                _ => writeln!(self.out, "Uso: pagina <n>")?,
            },
            "sig" | "ant" => self.step(command == "sig").await?,
            "tamano" => match arg.parse::<u32>() {
                Ok(n) => {
                    let state = self.page.set_page_size(n).await;
                    self.show_list(&state)?;
                }
                Err(_) => writeln!(self.out, "Uso: tamano <n>")?,
            },
            "ver" => {
                if let Some(id) = self.parse_id(arg)?
                    && let Some(employee) = self.page.view(id).await
                {
                    writeln!(self.out, "{}", view::render_detail(&employee))?;
                }
            }
            "nuevo" => {
                let today = chrono::Local::now().date_naive();
                if self.page.open_create(today).is_some() {
                    writeln!(self.out, "Nuevo empleado. Asigna campos con <campo>=<valor> y escribe 'guardar'.")?;
                }
            }
            "editar" => {
                if let Some(id) = self.parse_id(arg)?
                    && let Some(employee) = self.page.view(id).await
                    && self.page.open_edit(&employee).is_some()
                {
                    writeln!(self.out, "Editando {}.", employee.display_label())?;
                }
            }
            "eliminar" => {
                if let Some(id) = self.parse_id(arg)?
                    && let Some(employee) = self.page.view(id).await
                    && let Some(prompt) = self.page.request_delete(employee)
                {
                    writeln!(self.out, "{} [si/no]", prompt)?;
                }
            }
            "ficha" => {
                if let Some(id) = self.parse_id(arg)? {
                    self.page.download_ficha(id).await;
                }
            }
            "exportar" => {
                use clap::ValueEnum;
                match ExportFormat::from_str(arg, true) {
                    Ok(format) => {
                        // failures are already notified
                        let _ = self.page.export(format, chrono::Local::now().naive_local());
                    }
                    Err(_) => writeln!(self.out, "Uso: exportar xlsx|pdf|csv")?,
                }
            }
            other => writeln!(self.out, "Comando desconocido: '{}'. Escribe 'ayuda'.", other)?,
        }
        Ok(Flow::Continue)
    }

    fn parse_id(&mut self, arg: &str) -> anyhow::Result<Option<i64>> {
        match arg.parse::<i64>() {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                writeln!(self.out, "Se esperaba un id numérico")?;
                Ok(None)
            }
        }
    }

    async fn step(&mut self, forward: bool) -> anyhow::Result<()> {
        let Some(current) = self.page.current_page() else {
            writeln!(self.out, "No hay página cargada")?;
            return Ok(());
        };
        let target = match forward {
            true if current.has_next() => current.number + 1,
            false if current.has_previous() => current.number - 1,
            _ => {
                writeln!(self.out, "No hay más páginas en esa dirección")?;
                return Ok(());
            }
        };
        let state = self.page.go_to_page(target).await;
        self.show_list(&state)
    }

    async fn answer_delete(&mut self, line: &str) -> anyhow::Result<()> {
        if is_yes(line) {
            self.page.confirm_delete().await;
            let state = self.page.state();
            self.show_list(&state)?;
        } else {
            self.page.cancel_delete();
            writeln!(self.out, "Eliminación cancelada")?;
        }
        Ok(())
    }

    async fn handle_form(&mut self, line: &str) -> anyhow::Result<Flow> {
        let today = chrono::Local::now().date_naive();
        match line {
            "cancelar" => {
                self.page.close_form();
                writeln!(self.out, "Formulario cerrado")?;
            }
            "guardar" => match self.page.submit_form(today).await {
                Some(SubmitOutcome::Invalid(errors)) => {
                    writeln!(self.out, "Revisa los campos marcados:\n{}", view::render_errors(&errors))?;
                }
                Some(SubmitOutcome::Saved(_) | SubmitOutcome::SavedWithWarning { .. }) => {
                    let state = self.page.state();
                    self.show_list(&state)?;
                }
                Some(SubmitOutcome::Failed { .. } | SubmitOutcome::SessionExpired) | None => {}
            },
            "errores" => {
                if let Some(form) = self.page.form() {
                    let text = view::render_errors(form.errors());
                    writeln!(self.out, "{}", if text.is_empty() { "Sin errores" } else { text.as_str() })?;
                }
            }
            "campos" => {
                if let Some(form) = self.page.form() {
                    let lines: Vec<String> = form
                        .visible_fields()
                        .into_iter()
                        .map(|f| {
                            let value = match f.key {
                                FieldKey::Activo => if form.active() { "sí" } else { "no" }.to_string(),
                                key => form.value(key).to_string(),
                            };
                            let lock = if form.is_editable(f.key) { "" } else { " (solo lectura)" };
                            format!("  {:<20} {}{}", f.name, value, lock)
                        })
                        .collect();
                    writeln!(self.out, "{}", lines.join("\n"))?;
                }
            }
            _ => match line.split_once('=') {
                Some((name, value)) => match FieldKey::from_name(name) {
                    Some(key) => {
                        if let Some(form) = self.page.form_mut() {
                            form.set(key, value.trim());
                            if key != FieldKey::Activo
                                && let Some(error) = form.blur(key, today)
                            {
                                writeln!(self.out, "  {}: {}", key.spec().label, error)?;
                            }
                        }
                    }
                    None => writeln!(self.out, "Campo desconocido: '{}'", name.trim())?,
                },
                None => writeln!(self.out, "En el formulario: <campo>=<valor>, campos, errores, guardar o cancelar")?,
            },
        }
        Ok(Flow::Continue)
    }
}
