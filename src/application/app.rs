use super::ledger::PaymentLedger;
use super::session::{Access, RouteKind, SessionManager, check_new_password};
use super::workflow::{Confirmation, RequestContext, RequestWorkflow};
use crate::domain::aggregates::DashboardSummary;
use crate::domain::fees::TransactionDetail;
use crate::domain::identity::Identity;
use crate::domain::payment::{PaymentMethod, PaymentRecord};
use crate::domain::payout::PayoutAccount;
use crate::error::{JamaError, Result};
use tracing::info;

/// Payout details as typed into the editor, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayoutForm {
    Bank {
        bank: String,
        account_number: String,
        branch: String,
    },
    MobileMoney {
        provider: String,
        number: String,
    },
}

/// Something the member asked the application to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Login { service_id: String, password: String },
    VerifyServiceId { service_id: String },
    Signup { service_id: String, password: String, confirm: String },
    Logout,
    Dashboard,
    Payments,
    SelectRecord(u32),
    SelectMethod(PaymentMethod),
    ConfirmRequest,
    CancelRequest,
    Transactions,
    Transaction(u32),
    Profile,
    SavePayout(PayoutForm),
}

/// What the presentation layer should show next.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Loading,
    Login { error: Option<String> },
    Signup { verified: Option<Identity>, error: Option<String> },
    Dashboard { member: Identity, summary: DashboardSummary },
    Payments { unpaid: Vec<PaymentRecord>, notice: Option<String> },
    MethodSelection(RequestContext),
    Confirmation(Confirmation),
    Transactions(Vec<PaymentRecord>),
    TransactionDetail(TransactionDetail),
    TransactionNotFound(u32),
    Profile { member: Identity, payout: Option<PayoutAccount>, notice: Option<String> },
    PayoutEditor { error: String },
}

/// Wires the session, the ledger and the request workflow together.
///
/// One instance serves one running client. The ledger follows the signed-in
/// member: it is reloaded whenever the session identity changes.
pub struct JamaApp {
    session: SessionManager,
    ledger: PaymentLedger,
    workflow: RequestWorkflow,
    payout: Option<PayoutAccount>,
}

impl JamaApp {
    pub fn new(session: SessionManager, ledger: PaymentLedger) -> Self {
        Self {
            session,
            ledger,
            workflow: RequestWorkflow::new(),
            payout: None,
        }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn ledger(&self) -> &PaymentLedger {
        &self.ledger
    }

    /// Restores any persisted session and returns the landing screen.
    pub async fn start(&mut self) -> Result<Screen> {
        self.session.restore().await;
        self.sync_ledger().await?;
        match self.session.identity().await {
            Some(_) => Ok(self.dashboard().await),
            None => Ok(Screen::Login { error: None }),
        }
    }

    pub async fn handle(&mut self, intent: Intent) -> Result<Screen> {
        let route = match intent {
            Intent::Login { .. } | Intent::VerifyServiceId { .. } | Intent::Signup { .. } => {
                RouteKind::Public
            }
            _ => RouteKind::Protected,
        };

        match self.session.guard(route).await {
            Access::Allow => {}
            Access::Loading => return Ok(Screen::Loading),
            Access::RedirectToLogin => return Ok(Screen::Login { error: None }),
            Access::RedirectToDashboard => return Ok(self.dashboard().await),
        }

        let screen = match intent {
            Intent::Login {
                service_id,
                password,
            } => match self.session.login(&service_id, &password).await {
                Ok(_) => {
                    self.sync_ledger().await?;
                    self.dashboard().await
                }
                Err(e) => Screen::Login {
                    error: Some(e.to_string()),
                },
            },
            Intent::VerifyServiceId { service_id } => {
                match self.session.verify_service_id(&service_id).await {
                    Ok(identity) => Screen::Signup {
                        verified: Some(identity),
                        error: None,
                    },
                    Err(e) => Screen::Signup {
                        verified: None,
                        error: Some(e.to_string()),
                    },
                }
            }
            Intent::Signup {
                service_id,
                password,
                confirm,
            } => self.signup(&service_id, &password, &confirm).await?,
            Intent::Logout => {
                self.session.logout().await;
                self.workflow.abandon();
                self.payout = None;
                self.sync_ledger().await?;
                Screen::Login { error: None }
            }
            Intent::Dashboard => self.dashboard().await,
            Intent::Payments => self.payments(None).await,
            Intent::SelectRecord(id) => self.select_record(id).await,
            Intent::SelectMethod(method) => {
                match self.workflow.select_method(method).cloned() {
                    Ok(context) => Screen::MethodSelection(context),
                    Err(_) => self.payments(None).await,
                }
            }
            Intent::ConfirmRequest => self.confirm().await?,
            Intent::CancelRequest => {
                self.workflow.abandon();
                self.payments(None).await
            }
            Intent::Transactions => Screen::Transactions(self.ledger.transaction_history().await),
            Intent::Transaction(id) => match self.ledger.record(id).await {
                Some(record) => Screen::TransactionDetail(TransactionDetail::from_record(&record)),
                None => Screen::TransactionNotFound(id),
            },
            Intent::Profile => self.profile(None).await,
            Intent::SavePayout(form) => self.save_payout(form).await,
        };
        Ok(screen)
    }

    async fn sync_ledger(&self) -> Result<()> {
        let identity = self.session.identity().await.map(|i| i.id);
        if identity != self.ledger.owner().await {
            self.ledger.load(identity.as_ref()).await?;
        }
        Ok(())
    }

    async fn dashboard(&self) -> Screen {
        match self.session.identity().await {
            Some(member) => Screen::Dashboard {
                member,
                summary: self.ledger.summary().await,
            },
            None => Screen::Login { error: None },
        }
    }

    async fn profile(&self, notice: Option<String>) -> Screen {
        match self.session.identity().await {
            Some(member) => Screen::Profile {
                member,
                payout: self.payout.clone(),
                notice,
            },
            None => Screen::Login { error: None },
        }
    }

    async fn payments(&self, notice: Option<String>) -> Screen {
        Screen::Payments {
            unpaid: self.ledger.unpaid_records().await,
            notice,
        }
    }

    async fn signup(&mut self, service_id: &str, password: &str, confirm: &str) -> Result<Screen> {
        if let Err(e) = check_new_password(password, confirm) {
            return Ok(Screen::Signup {
                verified: None,
                error: Some(e.to_string()),
            });
        }
        match self.session.signup(service_id, password).await {
            Ok(_) => {
                self.sync_ledger().await?;
                Ok(self.dashboard().await)
            }
            Err(e) => Ok(Screen::Signup {
                verified: None,
                error: Some(e.to_string()),
            }),
        }
    }

    async fn select_record(&mut self, id: u32) -> Screen {
        let Some(record) = self.ledger.record(id).await else {
            return self
                .payments(Some(JamaError::RecordNotFound(id).to_string()))
                .await;
        };
        match self.workflow.begin(&record).cloned() {
            Ok(context) => Screen::MethodSelection(context),
            Err(e) => self.payments(Some(e.to_string())).await,
        }
    }

    async fn confirm(&mut self) -> Result<Screen> {
        // The method screen preselects mobile money.
        let unpriced = matches!(self.workflow.current(), Ok(context) if context.method.is_none());
        if unpriced {
            self.workflow.select_method(PaymentMethod::default())?;
        }
        let screen = match self.workflow.confirm(&self.ledger).await {
            Ok(confirmation) => Screen::Confirmation(confirmation),
            Err(JamaError::NoActiveRequest) => self.payments(None).await,
            Err(e) => self.payments(Some(e.to_string())).await,
        };
        Ok(screen)
    }

    async fn save_payout(&mut self, form: PayoutForm) -> Screen {
        let account = match &form {
            PayoutForm::Bank {
                bank,
                account_number,
                branch,
            } => PayoutAccount::bank(bank, account_number, branch),
            PayoutForm::MobileMoney { provider, number } => {
                PayoutAccount::mobile_money(provider, number)
            }
        };
        match account {
            Ok(account) => {
                info!(payout = %account, "Payout method saved");
                self.payout = Some(account);
                self.profile(Some("Payment method saved".to_string())).await
            }
            Err(e) => Screen::PayoutEditor {
                error: e.to_string(),
            },
        }
    }
}
