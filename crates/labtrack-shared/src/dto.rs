//! Data Transfer Objects - request/response bodies for the API.
//!
//! Field rules are declared with `validator` derives; requests convert into
//! domain values, so handlers only ever see well-formed input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use labtrack_core::domain::{
    AnalyticalTest, DeviceUpdate, ExperimentDraft, ExposureConditions, MaterialFeedstock,
    NewDevice, NewReactor, NewReading, NewUser, ReactorUpdate, ReadingPayload, User, UserUpdate,
};
use labtrack_core::error::DomainError;
use labtrack_core::time::{parse_clock, parse_date, parse_range};

/// Run the derived field rules, reporting the first failure as an invalid request.
pub fn validated<T: Validate>(req: T) -> Result<T, DomainError> {
    req.validate().map_err(validation_error)?;
    Ok(req)
}

fn validation_error(errors: ValidationErrors) -> DomainError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let message = fields
        .into_iter()
        .find_map(|(field, errs)| {
            errs.first().map(|e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .unwrap_or_else(|| "request is invalid".to_string());

    DomainError::validation(message)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// --- Auth ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub access_token_expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PasswordResetRequest {
    #[validate(email(message = "invalid email address"))]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResetPasswordQuery {
    pub token: Option<String>,
}

// --- Users ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

impl CreateUserRequest {
    /// Split into the account data and the plain-text password to hash.
    pub fn into_new_user(self) -> Result<(NewUser, String), DomainError> {
        let req = validated(self)?;

        let user = NewUser {
            role: req.role.parse()?,
            name: req.name,
            email: req.email,
            phone_number: non_blank(req.phone_number),
            is_active: req.is_active,
        };
        Ok((user, req.password))
    }
}

/// Partial user update. An empty `phoneNumber` clears the stored number;
/// leaving the field out keeps it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    #[validate(email(message = "invalid email address"))]
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateUserRequest {
    pub fn changes_role(&self) -> bool {
        self.role.is_some()
    }

    pub fn into_update(self) -> Result<UserUpdate, DomainError> {
        let req = validated(self)?;

        Ok(UserUpdate {
            role: req.role.as_deref().map(str::parse).transpose()?,
            name: non_blank(req.name),
            email: req.email,
            phone_number: req.phone_number.map(|p| non_blank(Some(p))),
            is_active: req.is_active,
        })
    }
}

// --- Reactors ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReactorRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub pathway: Option<String>,
    #[serde(default)]
    pub pdf_url: Option<String>,
}

impl CreateReactorRequest {
    pub fn into_new_reactor(self) -> Result<NewReactor, DomainError> {
        let req = validated(self)?;

        Ok(NewReactor {
            status: req.status.parse()?,
            name: req.name,
            pathway: non_blank(req.pathway),
            pdf_url: non_blank(req.pdf_url),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReactorRequest {
    pub name: Option<String>,
    pub status: Option<String>,
    pub pathway: Option<String>,
    pub pdf_url: Option<String>,
}

impl UpdateReactorRequest {
    pub fn into_update(self) -> Result<ReactorUpdate, DomainError> {
        Ok(ReactorUpdate {
            status: self.status.as_deref().map(str::parse).transpose()?,
            name: non_blank(self.name),
            pathway: non_blank(self.pathway),
            pdf_url: non_blank(self.pdf_url),
        })
    }
}

// --- Devices ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeviceRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub reactor_id: i64,
    #[serde(default)]
    pub status: bool,
}

impl CreateDeviceRequest {
    pub fn into_new_device(self) -> Result<NewDevice, DomainError> {
        let req = validated(self)?;

        Ok(NewDevice {
            name: req.name,
            reactor_id: req.reactor_id,
            status: req.status,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeviceRequest {
    pub reactor_id: Option<i64>,
    pub name: Option<String>,
    pub status: Option<bool>,
}

impl From<UpdateDeviceRequest> for DeviceUpdate {
    fn from(req: UpdateDeviceRequest) -> Self {
        Self {
            name: non_blank(req.name),
            reactor_id: req.reactor_id,
            status: req.status,
        }
    }
}

// --- Readings ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReadingRequest {
    pub device_id: i64,
    #[serde(flatten)]
    pub payload: ReadingPayload,
}

impl CreateReadingRequest {
    pub fn into_new_reading(self) -> Result<NewReading, DomainError> {
        self.payload.validate()?;

        Ok(NewReading {
            device_id: self.device_id,
            payload: self.payload,
        })
    }
}

// --- Experiments ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticalTestRequest {
    #[validate(length(min = 1, message = "analytical test name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "analytical test sampleId is required"))]
    pub sample_id: String,
    pub date: String,
    #[validate(length(min = 1, message = "analytical test pdfUrl is required"))]
    pub pdf_url: String,
}

impl AnalyticalTestRequest {
    fn into_test(self) -> Result<AnalyticalTest, DomainError> {
        let req = validated(self)?;

        Ok(AnalyticalTest {
            date: parse_date(&req.date)?,
            name: req.name,
            sample_id: req.sample_id,
            pdf_url: req.pdf_url,
        })
    }
}

/// Flat experiment body used by both create and update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentRequest {
    pub batch_id: String,
    pub reactor_id: i64,
    pub operator: String,
    pub date: String,
    pub block_id: String,
    pub time_start: String,
    pub time_end: String,

    #[serde(default)]
    pub mix_design: String,
    #[serde(default)]
    pub cement: String,
    #[serde(default)]
    pub fine_aggregate: String,
    #[serde(default)]
    pub coarse_aggregate: String,
    #[serde(default)]
    pub water: String,
    #[serde(default)]
    pub water_cement_ratio: String,
    #[serde(default)]
    pub block_size_length: String,
    #[serde(default)]
    pub block_size_width: String,
    #[serde(default)]
    pub block_size_height: String,

    #[serde(default)]
    pub co2_form: String,
    #[serde(default)]
    pub co2_mass: String,
    #[serde(default)]
    pub injection_pressure: String,
    #[serde(default)]
    pub head_space: String,
    #[serde(default)]
    pub reaction_time: String,

    #[serde(default)]
    pub analytical_tests: Vec<AnalyticalTestRequest>,
}

impl ExperimentRequest {
    pub fn into_draft(self) -> Result<ExperimentDraft, DomainError> {
        let draft = ExperimentDraft {
            date: parse_date(&self.date)?,
            time_start: parse_clock(&self.time_start)?,
            time_end: parse_clock(&self.time_end)?,
            analytical_tests: self
                .analytical_tests
                .into_iter()
                .map(AnalyticalTestRequest::into_test)
                .collect::<Result<_, _>>()?,
            material_feedstock: MaterialFeedstock {
                mix_design: self.mix_design,
                cement: self.cement,
                fine_aggregate: self.fine_aggregate,
                coarse_aggregate: self.coarse_aggregate,
                water: self.water,
                water_cement_ratio: self.water_cement_ratio,
                block_size_length: self.block_size_length,
                block_size_width: self.block_size_width,
                block_size_height: self.block_size_height,
            },
            exposure_conditions: ExposureConditions {
                co2_form: self.co2_form,
                co2_mass: self.co2_mass,
                injection_pressure: self.injection_pressure,
                head_space: self.head_space,
                reaction_time: self.reaction_time,
            },
            batch_id: self.batch_id,
            reactor_id: self.reactor_id,
            operator: self.operator,
            block_id: self.block_id,
        };

        draft.validate()?;
        Ok(draft)
    }
}

// --- Reports ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingReportRequest {
    pub device_id: i64,
    pub start: String,
    pub end: String,
}

impl ReadingReportRequest {
    pub fn time_range(&self) -> Result<(DateTime<Utc>, DateTime<Utc>), DomainError> {
        parse_range(&self.start, &self.end)
    }
}
