use super::{fail_with_notification, print_notification, require_employees_screen};
use crate::app::AppContext;
use crate::employees::schema::FieldKey;
use crate::employees::{DeletionOutcome, EmployeeForm, EmployeesPage, ListState, SubmitOutcome};
use crate::view;
use clap::{Args, Subcommand};
use hr_client::Photo;
use shared::error::ErrorCode;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Query flags shared by `listar` and `exportar`
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    #[arg(short, long, help = "Free text over number, name, phone and email")]
    pub search: Option<String>,

    #[arg(long, help = "Only active employees")]
    pub active_only: bool,

    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..), help = "Page number, starting at 1")]
    pub page: u32,

    #[arg(long, help = "Rows per page (defaults to the configured size)")]
    pub size: Option<u32>,
}

impl ListArgs {
    pub async fn load(&self, page: &EmployeesPage) -> ListState {
        page.load(self.search.clone(), self.active_only, self.page - 1, self.size)
            .await
    }
}

#[derive(Subcommand)]
pub enum EmployeeCommands {
    #[command(name = "listar", about = "List one page of employees")]
    List(ListArgs),

    #[command(name = "ver", about = "Show every field of one employee")]
    Show {
        #[arg(help = "Employee id")]
        id: i64,
    },

    #[command(name = "crear", about = "Create an employee")]
    Create {
        #[arg(long = "set", value_name = "CAMPO=VALOR", value_parser = parse_assignment, help = "Field value, repeatable (e.g. --set nombres=Ana)")]
        values: Vec<(FieldKey, String)>,

        #[arg(long, help = "Photo uploaded after the record is saved")]
        photo: Option<PathBuf>,
    },

    #[command(name = "editar", about = "Update an employee (the number is read-only)")]
    Update {
        #[arg(help = "Employee id")]
        id: i64,

        #[arg(long = "set", value_name = "CAMPO=VALOR", value_parser = parse_assignment, help = "Field value, repeatable")]
        values: Vec<(FieldKey, String)>,

        #[arg(long, help = "Photo uploaded after the record is saved")]
        photo: Option<PathBuf>,
    },

    #[command(name = "eliminar", about = "Delete an employee after confirmation")]
    Delete {
        #[arg(help = "Employee id")]
        id: i64,

        #[arg(long, short, help = "Skip the confirmation prompt")]
        yes: bool,
    },

    #[command(name = "ficha", about = "Download the generated employee document")]
    Ficha {
        #[arg(help = "Employee id")]
        id: i64,
    },

    #[command(name = "campos", about = "List the form field names accepted by --set")]
    Fields,
}

/// `campo=valor`, field names as in `hr-admin empleados campos`
pub fn parse_assignment(raw: &str) -> Result<(FieldKey, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("se esperaba CAMPO=VALOR, no '{}'", raw))?;
    let key = FieldKey::from_name(name).ok_or_else(|| format!("campo desconocido: '{}'", name.trim()))?;
    Ok((key, value.to_string()))
}

fn read_photo(path: &PathBuf) -> anyhow::Result<Photo> {
    let bytes = std::fs::read(path)?;
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    Ok(Photo::from_file_name(name, bytes))
}

fn fill(form: &mut EmployeeForm, values: Vec<(FieldKey, String)>, photo: Option<Photo>) {
    for (key, value) in values {
        form.set(key, value);
    }
    if let Some(photo) = photo {
        form.attach_photo(photo);
    }
}

pub async fn handle(cmd: EmployeeCommands, ctx: &AppContext) -> anyhow::Result<()> {
    if matches!(cmd, EmployeeCommands::Fields) {
        for section in crate::employees::schema::Section::ALL {
            println!("[{}]", section.title());
            for field in crate::employees::schema::fields_in(section) {
                let required = if field.required.is_some() { " *" } else { "" };
                println!("  {:<22} {}{}", field.name, field.label, required);
            }
        }
        return Ok(());
    }

    require_employees_screen(ctx)?;
    let mut page = ctx.employees_page();
    let today = chrono::Local::now().date_naive();

    match cmd {
        EmployeeCommands::List(args) => {
            let state = args.load(&page).await;
            if let ListState::Error { .. } = state {
                return Err(fail_with_notification(ctx, crate::employees::controller::LOAD_FAILED));
            }
            println!("{}", view::render_list_state(&state));
        }
        EmployeeCommands::Show { id } => {
            let employee = page
                .view(id)
                .await
                .ok_or_else(|| fail_with_notification(ctx, "Empleado no encontrado"))?;
            println!("{}", view::render_detail(&employee));
        }
        EmployeeCommands::Create { values, photo } => {
            let photo = photo.as_ref().map(read_photo).transpose()?;
            let form = page
                .open_create(today)
                .ok_or_else(|| fail_with_notification(ctx, "Acceso denegado"))?;
            fill(form, values, photo);
            submit(ctx, &mut page, today).await?;
        }
        EmployeeCommands::Update { id, values, photo } => {
            let photo = photo.as_ref().map(read_photo).transpose()?;
            let employee = page
                .view(id)
                .await
                .ok_or_else(|| fail_with_notification(ctx, "Empleado no encontrado"))?;
            let form = page
                .open_edit(&employee)
                .ok_or_else(|| fail_with_notification(ctx, "Acceso denegado"))?;
            fill(form, values, photo);
            submit(ctx, &mut page, today).await?;
        }
        EmployeeCommands::Delete { id, yes } => {
            let employee = page
                .view(id)
                .await
                .ok_or_else(|| fail_with_notification(ctx, "Empleado no encontrado"))?;
            let prompt = page
                .request_delete(employee)
                .ok_or_else(|| fail_with_notification(ctx, "Acceso denegado"))?;
            if !yes && !confirm(&prompt)? {
                page.cancel_delete();
                println!("Eliminación cancelada");
                return Ok(());
            }
            match page.confirm_delete().await {
                DeletionOutcome::Deleted(_) => print_notification(ctx),
                DeletionOutcome::Failed { message, .. } => anyhow::bail!(message),
                DeletionOutcome::SessionExpired(_) => {
                    anyhow::bail!(ErrorCode::SessionExpired.message())
                }
                DeletionOutcome::NothingPending => {}
            }
        }
        EmployeeCommands::Ficha { id } => {
            page.download_ficha(id)
                .await
                .ok_or_else(|| fail_with_notification(ctx, "No se pudo descargar la ficha"))?;
            print_notification(ctx);
        }
        EmployeeCommands::Fields => {}
    }
    Ok(())
}

async fn submit(
    ctx: &AppContext,
    page: &mut EmployeesPage,
    today: chrono::NaiveDate,
) -> anyhow::Result<()> {
    match page.submit_form(today).await {
        Some(SubmitOutcome::Invalid(errors)) => {
            eprintln!("{}", view::render_errors(&errors));
            anyhow::bail!("Revisa los campos marcados")
        }
        Some(SubmitOutcome::Failed { message }) => anyhow::bail!(message),
        Some(SubmitOutcome::SessionExpired) => anyhow::bail!(ErrorCode::SessionExpired.message()),
        Some(SubmitOutcome::Saved(employee)) | Some(SubmitOutcome::SavedWithWarning { employee, .. }) => {
            print_notification(ctx);
            println!("{} (ID {})", employee.display_label(), employee.id);
            Ok(())
        }
        None => Ok(()),
    }
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{} [s/N] ", prompt);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(is_yes(&line))
}

pub(crate) fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "s" | "si" | "sí" | "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("apellido-paterno=López"),
            Ok((FieldKey::ApellidoPaterno, "López".to_string()))
        );
        assert_eq!(
            parse_assignment("email=a=b@x.mx"),
            Ok((FieldKey::Email, "a=b@x.mx".to_string()))
        );
        assert!(parse_assignment("nombres").is_err());
        assert!(parse_assignment("sueldo=10").unwrap_err().contains("sueldo"));
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes("s\n"));
        assert!(is_yes(" Sí "));
        assert!(!is_yes(""));
        assert!(!is_yes("no"));
    }
}
