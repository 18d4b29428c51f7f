//! Conversions between shared request DTOs and domain request models.

use crate::domain::calendar::CalendarService;
use crate::domain::models::request::{
    DayBucket as DomainDayBucket, RechargeRequest as DomainRequest, RequestError,
};
use shared::{DayBucket as SharedDayBucket, RechargeRequest as SharedRequest};

pub struct RequestMapper;

impl RequestMapper {
    pub fn to_domain(dto: SharedRequest) -> DomainRequest {
        DomainRequest {
            id: dto.id,
            phone_number: dto.phone_number,
            amount: dto.amount,
            timestamp: dto.timestamp,
            completed: dto.completed,
            name: dto.name,
        }
    }

    pub fn to_dto(domain: DomainRequest) -> SharedRequest {
        SharedRequest {
            id: domain.id,
            phone_number: domain.phone_number,
            amount: domain.amount,
            timestamp: domain.timestamp,
            completed: domain.completed,
            name: domain.name,
        }
    }
}

pub struct DayBucketMapper;

impl DayBucketMapper {
    /// Lenient conversion used for stored buckets: an unreadable date label
    /// is treated as "not stamped yet"
    pub fn to_domain(dto: SharedDayBucket) -> DomainDayBucket {
        DomainDayBucket {
            date: CalendarService::parse_day(&dto.date),
            requests: dto.requests.into_iter().map(RequestMapper::to_domain).collect(),
        }
    }

    /// Strict conversion used for client-supplied buckets: a non-blank date
    /// must parse
    pub fn to_domain_checked(dto: SharedDayBucket) -> Result<DomainDayBucket, RequestError> {
        if !dto.date.trim().is_empty() && CalendarService::parse_day(&dto.date).is_none() {
            return Err(RequestError::InvalidDate(dto.date));
        }
        Ok(Self::to_domain(dto))
    }

    pub fn to_dto(domain: DomainDayBucket) -> SharedDayBucket {
        SharedDayBucket {
            date: domain.date.map(CalendarService::format_day).unwrap_or_default(),
            requests: domain.requests.into_iter().map(RequestMapper::to_dto).collect(),
        }
    }
}
