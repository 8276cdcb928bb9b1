//! Employee routes backed by an in-memory directory

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};

use cb_core::args;
use cb_core::errors::{raise, DomainError, DomainResult};

use crate::app::AppState;
use crate::dto::{Employee, NewEmployeeRequest};
use crate::handlers::{validate, ApiResult};

/// Object name reported on validation sub-errors
const NEW_EMPLOYEE_OBJECT: &str = "newEmployee";

/// Employees keyed by id
#[derive(Debug)]
pub struct EmployeeDirectory {
    employees: RwLock<HashMap<String, Employee>>,
    next_id: AtomicU64,
}

impl Default for EmployeeDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl EmployeeDirectory {
    pub fn new() -> Self {
        Self {
            employees: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Directory holding one employee with id `1`
    pub fn seeded() -> Self {
        let directory = Self::new();
        let seed = NewEmployeeRequest {
            name: "Ada Lovelace".to_string(),
            email: "ada@cometbid.org".to_string(),
            age: 36,
            department: Some("Engineering".to_string()),
        };
        if let Err(err) = directory.insert(seed) {
            tracing::warn!(error = %err, "Failed to seed employee directory");
        }
        directory
    }

    pub fn find(&self, id: &str) -> DomainResult<Employee> {
        let employees = self.employees.read().map_err(|_| poisoned())?;
        employees
            .get(id)
            .cloned()
            .ok_or_else(|| raise::employee_not_found(args![id]).add_context("id", id))
    }

    /// Store a new employee; emails are unique ignoring case
    pub fn insert(&self, request: NewEmployeeRequest) -> DomainResult<Employee> {
        let mut employees = self.employees.write().map_err(|_| poisoned())?;

        let taken = employees
            .values()
            .any(|existing| existing.email.eq_ignore_ascii_case(&request.email));
        if taken {
            return Err(raise::employee_already_exists(args![request.email]).add_context("email", request.email));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed).to_string();
        let employee = Employee::from_request(id.clone(), request);
        employees.insert(id, employee.clone());
        Ok(employee)
    }

    pub fn len(&self) -> usize {
        self.employees.read().map(|employees| employees.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> DomainError {
    raise::system_error(args![]).add_context("detail", "employee directory lock poisoned")
}

/// `GET /api/v1/employees/{id}`
pub async fn get_employee(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let employee = state.employees.find(&path.into_inner())?;
    Ok(state.envelope.success_response(&req, StatusCode::OK, employee))
}

/// `POST /api/v1/employees`
pub async fn create_employee(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<NewEmployeeRequest>,
) -> ApiResult<HttpResponse> {
    let request = body.into_inner();
    validate(NEW_EMPLOYEE_OBJECT, &request)?;

    let employee = state.employees.insert(request)?;
    tracing::info!(id = %employee.id, "Employee created");
    Ok(state.envelope.success_response(&req, StatusCode::CREATED, employee))
}
